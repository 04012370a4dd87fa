// VaultCipher - Moteur CCM (Counter with CBC-MAC)
// Reference : NIST SP 800-38C, RFC 3610
//
// Ce module implemente le mode CCM au-dessus des cles de round AES
// pre-expandues.
//
// # Architecture
// - Parametres derives du nonce : L = 15 - len(nonce), nombre d'octets
//   du champ de longueur (L dans [2,8] => nonce dans [7,13])
// - `format_b0` : bloc d'en-tete B0 (flags, nonce, longueur du message)
// - `CbcMac` : accumulateur CBC-MAC avec tampon de bloc, pour que le
//   prefixe de longueur AAD, l'AAD et son padding puissent chevaucher
//   les frontieres de bloc sans concatenation en memoire
// - Encodage de la longueur AAD : forme courte 2 octets si < 0xFF00,
//   sinon forme longue 0xFF 0xFE || longueur u32
// - Compteurs : flags (L-1), nonce, compteur big-endian sur L octets ;
//   le compteur 0 masque le tag (S0), le keystream du message demarre a 1
//
// # Securite
// - Contrairement a GCM, le MAC porte sur le CLAIR : le dechiffrement
//   produit d'abord le clair puis verifie le tag. En cas d'echec, le
//   clair produit speculativement est efface avant de rendre la main
// - Verification du tag en temps constant
// - Validation complete des parametres avant tout travail cryptographique

use crate::aes::{encrypt_block, ExpandedKey};
use crate::constants::{
    AES_BLOCK_SIZE, CCM_AAD_SHORT_LIMIT, CCM_NONCE_MAX, CCM_NONCE_MIN, CCM_TAG_MAX, CCM_TAG_MIN,
};
use crate::ct::ct_eq;
use crate::error::{CipherError, CipherResult};
use zeroize::Zeroize;

/// Accumulateur CBC-MAC : X_{i+1} = AES_K(X_i xor B_i).
///
/// Le tampon interne absorbe des entrees de longueur quelconque ; un bloc
/// n'est chiffre que lorsqu'il est complet. `pad_block` termine le bloc
/// courant avec des zeros (padding CCM standard).
struct CbcMac<'k> {
    key: &'k ExpandedKey,
    state: [u8; AES_BLOCK_SIZE],
    buf: [u8; AES_BLOCK_SIZE],
    buf_len: usize,
}

impl<'k> CbcMac<'k> {
    fn new(key: &'k ExpandedKey) -> Self {
        Self {
            key,
            state: [0u8; AES_BLOCK_SIZE],
            buf: [0u8; AES_BLOCK_SIZE],
            buf_len: 0,
        }
    }

    /// Absorbe des octets, en chainant un bloc des qu'il est plein.
    fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = (AES_BLOCK_SIZE - self.buf_len).min(data.len());
            self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&data[..take]);
            self.buf_len += take;
            data = &data[take..];
            if self.buf_len == AES_BLOCK_SIZE {
                self.process_block();
            }
        }
    }

    /// Termine le bloc courant par des zeros s'il est entame.
    fn pad_block(&mut self) {
        if self.buf_len > 0 {
            // La queue du tampon est deja a zero (reinitialisee apres
            // chaque bloc chiffre)
            self.process_block();
        }
    }

    fn process_block(&mut self) {
        for i in 0..AES_BLOCK_SIZE {
            self.state[i] ^= self.buf[i];
        }
        self.state = encrypt_block(self.key, &self.state);
        self.buf = [0u8; AES_BLOCK_SIZE];
        self.buf_len = 0;
    }

    /// Valeur de chainage finale (MAC brut avant masquage par S0).
    fn finalize(self) -> [u8; AES_BLOCK_SIZE] {
        debug_assert_eq!(self.buf_len, 0, "bloc non termine avant finalize");
        self.state
    }
}

/// Valide nonce, tag, longueur de message et d'AAD ; retourne L.
fn check_params(
    nonce_len: usize,
    tag_len: usize,
    msg_len: usize,
    aad_len: usize,
) -> CipherResult<usize> {
    if !(CCM_NONCE_MIN..=CCM_NONCE_MAX).contains(&nonce_len) {
        return Err(CipherError::InvalidNonceLength { actual: nonce_len });
    }
    if !(CCM_TAG_MIN..=CCM_TAG_MAX).contains(&tag_len) || tag_len % 2 != 0 {
        return Err(CipherError::InvalidTagLength { actual: tag_len });
    }

    let l = 15 - nonce_len;
    let max = (1u128 << (8 * l)) - 1;
    if msg_len as u128 > max {
        return Err(CipherError::MessageTooLong { max: max.min(u64::MAX as u128) as u64 });
    }
    // La forme longue encode la longueur AAD sur 32 bits
    if aad_len > u32::MAX as usize {
        return Err(CipherError::AadTooLong);
    }
    Ok(l)
}

/// Construit le bloc d'en-tete B0.
///
/// Octet 0 : flags = ((L-1) & 7) | (((M-2)/2) << 3) | (0x40 si AAD).
/// Octets 1..=len(nonce) : nonce. Les L derniers octets : longueur du
/// message en big-endian.
fn format_b0(l: usize, tag_len: usize, nonce: &[u8], msg_len: usize, has_aad: bool) -> [u8; 16] {
    let mut b0 = [0u8; AES_BLOCK_SIZE];
    b0[0] = ((l - 1) as u8 & 7)
        | ((((tag_len - 2) / 2) as u8) << 3)
        | if has_aad { 0x40 } else { 0 };
    b0[1..1 + nonce.len()].copy_from_slice(nonce);
    let len_bytes = (msg_len as u64).to_be_bytes();
    b0[AES_BLOCK_SIZE - l..].copy_from_slice(&len_bytes[8 - l..]);
    b0
}

/// Construit le bloc compteur A_i : flags = (L-1) & 7, nonce, compteur
/// big-endian sur L octets. Pas de bit AAD ni d'encodage de M.
fn format_ctr(l: usize, nonce: &[u8], counter: u64) -> [u8; 16] {
    let mut block = [0u8; AES_BLOCK_SIZE];
    block[0] = (l - 1) as u8 & 7;
    block[1..1 + nonce.len()].copy_from_slice(nonce);
    let ctr_bytes = counter.to_be_bytes();
    block[AES_BLOCK_SIZE - l..].copy_from_slice(&ctr_bytes[8 - l..]);
    block
}

/// Applique le keystream CTR au message, compteur demarrant a 1.
fn ctr_apply(key: &ExpandedKey, l: usize, nonce: &[u8], input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len());

    let mut counter: u64 = 1;
    for (in_chunk, out_chunk) in input.chunks(AES_BLOCK_SIZE).zip(output.chunks_mut(AES_BLOCK_SIZE)) {
        let block = format_ctr(l, nonce, counter);
        let keystream = encrypt_block(key, &block);
        for i in 0..in_chunk.len() {
            out_chunk[i] = in_chunk[i] ^ keystream[i];
        }
        counter += 1;
    }
}

/// CBC-MAC complet : B0, puis prefixe de longueur + AAD paddes, puis
/// message padde. Retourne la valeur de chainage finale (16 octets).
fn compute_mac(
    key: &ExpandedKey,
    l: usize,
    nonce: &[u8],
    tag_len: usize,
    aad: &[u8],
    payload: &[u8],
) -> [u8; 16] {
    let mut mac = CbcMac::new(key);

    let b0 = format_b0(l, tag_len, nonce, payload.len(), !aad.is_empty());
    mac.update(&b0);

    if !aad.is_empty() {
        // Prefixe de longueur : forme courte ou longue, fusionne avec
        // l'AAD dans le meme premier bloc
        if aad.len() < CCM_AAD_SHORT_LIMIT {
            mac.update(&(aad.len() as u16).to_be_bytes());
        } else {
            mac.update(&[0xFF, 0xFE]);
            mac.update(&(aad.len() as u32).to_be_bytes());
        }
        mac.update(aad);
        mac.pad_block();
    }

    mac.update(payload);
    mac.pad_block();
    mac.finalize()
}

/// Chiffre et authentifie en mode CCM.
///
/// Ecrit `plaintext.len()` octets dans `ciphertext` et le tag de
/// `tag.len()` octets (pair, 4 a 16) dans `tag`.
pub fn ccm_encrypt(
    key: &ExpandedKey,
    nonce: &[u8],
    plaintext: &[u8],
    aad: &[u8],
    ciphertext: &mut [u8],
    tag: &mut [u8],
) -> CipherResult<()> {
    let l = check_params(nonce.len(), tag.len(), plaintext.len(), aad.len())?;
    if ciphertext.len() < plaintext.len() {
        return Err(CipherError::BufferTooSmall {
            needed: plaintext.len(),
            actual: ciphertext.len(),
        });
    }

    let mut mac = compute_mac(key, l, nonce, tag.len(), aad, plaintext);

    ctr_apply(key, l, nonce, plaintext, &mut ciphertext[..plaintext.len()]);

    // S0 = AES_K(A_0) masque le MAC pour former le tag
    let a0 = format_ctr(l, nonce, 0);
    let s0 = encrypt_block(key, &a0);
    for i in 0..tag.len() {
        tag[i] = mac[i] ^ s0[i];
    }
    mac.zeroize();

    Ok(())
}

/// Dechiffre puis verifie en mode CCM.
///
/// Le MAC de CCM porte sur le clair : le clair est donc produit d'abord,
/// puis le tag est recalcule et compare en temps constant. Retourne
/// Ok(false) si le tag est invalide ; le clair produit speculativement
/// est alors efface du buffer de sortie.
pub fn ccm_decrypt(
    key: &ExpandedKey,
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
    tag: &[u8],
    plaintext: &mut [u8],
) -> CipherResult<bool> {
    let l = check_params(nonce.len(), tag.len(), ciphertext.len(), aad.len())?;
    if plaintext.len() < ciphertext.len() {
        return Err(CipherError::BufferTooSmall {
            needed: ciphertext.len(),
            actual: plaintext.len(),
        });
    }

    ctr_apply(key, l, nonce, ciphertext, &mut plaintext[..ciphertext.len()]);

    let mut mac = compute_mac(key, l, nonce, tag.len(), aad, &plaintext[..ciphertext.len()]);
    let a0 = format_ctr(l, nonce, 0);
    let s0 = encrypt_block(key, &a0);
    let mut expected = [0u8; AES_BLOCK_SIZE];
    for i in 0..tag.len() {
        expected[i] = mac[i] ^ s0[i];
    }
    let tag_ok = ct_eq(&expected[..tag.len()], tag);
    mac.zeroize();
    expected.zeroize();

    if !tag_ok {
        // Ne jamais exposer un clair non authentifie
        plaintext.zeroize();
        return Ok(false);
    }

    Ok(true)
}
