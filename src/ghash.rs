// VaultCipher - Multiplication GF(2^128) et accumulateur GHASH
// Reference : NIST SP 800-38D
//
// Ce module implemente l'arithmetique dans GF(2^128) necessaire au tag
// d'authentification GHASH du mode GCM.
//
// # Architecture
// - `GfElement` : element de GF(2^128) represente comme (hi:u64, lo:u64)
// - `gf_mul` : multiplication avec reduction par le polynome
//   P(x) = x^128 + x^7 + x^2 + x + 1 (0xE1...00)
// - `Ghash` : accumulateur en streaming, Y <- (Y xor X_i) * H bloc par
//   bloc, sans copie ni allocation des donnees d'entree
//
// # Securite
// - Le test du bit courant dans gf_mul est sans branche (masque 0/-1) :
//   le flot d'execution ne depend pas des bits des operandes
// - La sous-cle H est derivee de la cle : GfElement implemente Zeroize
//   pour etre efface avec le wrapper qui la detient

use crate::constants::AES_BLOCK_SIZE;
use zeroize::Zeroize;

/// Represente un element de GF(2^128) comme deux u64.
/// Convention big-endian pour compatibilite GCM.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct GfElement {
    pub hi: u64,
    pub lo: u64,
}

impl GfElement {
    /// Cree un element a partir de 16 octets (big-endian).
    pub fn from_bytes(b: &[u8; 16]) -> Self {
        Self {
            hi: u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
            lo: u64::from_be_bytes([b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]]),
        }
    }

    /// Convertit en 16 octets (big-endian).
    pub fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    /// XOR de deux elements.
    pub fn xor(self, other: Self) -> Self {
        Self {
            hi: self.hi ^ other.hi,
            lo: self.lo ^ other.lo,
        }
    }
}

impl Zeroize for GfElement {
    fn zeroize(&mut self) {
        self.hi.zeroize();
        self.lo.zeroize();
    }
}

/// Polynome de reduction pour GF(2^128) : x^128 + x^7 + x^2 + x + 1.
/// Representation : 0xE1 dans l'octet de poids fort.
const R_POLY: u64 = 0xE100000000000000;

/// Multiplication dans GF(2^128), bit a bit, MSB en premier.
///
/// Le XOR conditionnel sur le bit courant de `y` est realise par masque
/// (0 ou 0xFFFF...) plutot que par branche, de meme que la reduction sur
/// le bit sortant de `v`.
pub fn gf_mul(x: GfElement, y: GfElement) -> GfElement {
    let mut z = GfElement::default();
    let mut v = x;

    for word in [y.hi, y.lo] {
        for i in 0..64 {
            // Masque : tout-1 si le bit courant de Y vaut 1, sinon 0
            let mask = ((word >> (63 - i)) & 1).wrapping_neg();
            z.hi ^= v.hi & mask;
            z.lo ^= v.lo & mask;

            // Shift V a droite de 1 bit dans GF(2^128), reduction si le
            // bit sortant vaut 1
            let carry = (v.lo & 1).wrapping_neg();
            v.lo = (v.lo >> 1) | (v.hi << 63);
            v.hi >>= 1;
            v.hi ^= carry & R_POLY;
        }
    }

    z
}

/// Accumulateur GHASH en streaming.
///
/// GHASH(H, X) = (...((X_1 * H) xor X_2) * H ...) xor X_n) * H, calcule
/// bloc par bloc directement sur les slices de l'appelant. Les moteurs
/// alimentent l'AAD, le ciphertext puis le bloc de longueurs sans jamais
/// concatener les entrees en memoire.
pub struct Ghash {
    y: GfElement,
    h: GfElement,
}

impl Ghash {
    /// Cree un accumulateur pour la sous-cle H = AES_K(0^128).
    pub fn new(h: GfElement) -> Self {
        Self { y: GfElement::default(), h }
    }

    /// Absorbe un bloc complet de 16 octets.
    pub fn update_block(&mut self, block: &[u8; AES_BLOCK_SIZE]) {
        let x = GfElement::from_bytes(block);
        self.y = gf_mul(self.y.xor(x), self.h);
    }

    /// Absorbe des donnees de longueur quelconque, le dernier bloc partiel
    /// etant complete par des zeros (padding GCM standard).
    pub fn update_padded(&mut self, data: &[u8]) {
        let mut chunks = data.chunks_exact(AES_BLOCK_SIZE);
        for chunk in chunks.by_ref() {
            let block: [u8; 16] = chunk.try_into().expect("chunk de 16 octets");
            self.update_block(&block);
        }
        let rest = chunks.remainder();
        if !rest.is_empty() {
            let mut block = [0u8; AES_BLOCK_SIZE];
            block[..rest.len()].copy_from_slice(rest);
            self.update_block(&block);
        }
    }

    /// Termine le calcul et retourne le digest.
    pub fn finalize(self) -> GfElement {
        self.y
    }
}
