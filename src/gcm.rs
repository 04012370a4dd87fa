// VaultCipher - Moteur GCM (Galois/Counter Mode)
// Reference : NIST SP 800-38D
//
// Ce module implemente le mode GCM au-dessus des cles de round AES
// pre-expandues et de la sous-cle GHASH derivee une fois par cle.
//
// # Architecture
// - `derive_h`   : H = AES_K(0^128), calcule une fois a la construction
//   du wrapper et reutilise par tous les appels
// - `compute_j0` : nonce de 12 octets -> chemin rapide nonce || 0^31 || 1 ;
//   autre longueur -> GHASH du nonce padde suivi du bloc de longueur
// - `gctr`       : chiffrement compteur classique, increment 32 bits
//   big-endian, dernier bloc partiel gere
// - Tag : GHASH(H, AAD, C) masque par AES_K(J0), tronque a la longueur
//   demandee (1 a 16 octets)
//
// # Securite
// - Dechiffrement : le tag est verifie en temps constant AVANT de
//   produire le moindre octet de clair ; en cas d'echec le buffer de
//   sortie est efface et aucun clair partiel n'est expose
// - Aucune allocation sur le chemin chaud : l'etat de travail (compteur,
//   bloc de keystream, accumulateur GHASH) vit sur la pile et les sorties
//   vont dans les buffers de l'appelant

use crate::aes::{encrypt_block, ExpandedKey};
use crate::constants::{AES_BLOCK_SIZE, GCM_MAX_MESSAGE_SIZE, GCM_TAG_MAX, GCM_TAG_MIN};
use crate::ct::ct_eq;
use crate::error::{CipherError, CipherResult};
use crate::ghash::{GfElement, Ghash};
use zeroize::Zeroize;

/// Derive la sous-cle GHASH : H = AES_K(0^128).
pub fn derive_h(key: &ExpandedKey) -> GfElement {
    let h_block = encrypt_block(key, &[0u8; AES_BLOCK_SIZE]);
    GfElement::from_bytes(&h_block)
}

/// Incremente les 4 derniers octets du compteur (big-endian, avec wrap).
fn inc32(ctr: &mut [u8; AES_BLOCK_SIZE]) {
    let c = u32::from_be_bytes([ctr[12], ctr[13], ctr[14], ctr[15]]);
    ctr[12..16].copy_from_slice(&c.wrapping_add(1).to_be_bytes());
}

/// Derive le bloc compteur initial J0 a partir du nonce.
///
/// Nonce de 12 octets : J0 = nonce || 0^31 || 1, sans hachage.
/// Autre longueur : J0 = GHASH(H, nonce padde a 16 octets || bloc de
/// longueur), ou le bloc de longueur porte bitlen(nonce) en big-endian
/// dans ses 8 derniers octets.
fn compute_j0(h: &GfElement, nonce: &[u8]) -> [u8; AES_BLOCK_SIZE] {
    if nonce.len() == 12 {
        let mut j0 = [0u8; AES_BLOCK_SIZE];
        j0[..12].copy_from_slice(nonce);
        j0[15] = 1;
        return j0;
    }

    let mut g = Ghash::new(*h);
    g.update_padded(nonce);
    let mut len_block = [0u8; AES_BLOCK_SIZE];
    len_block[8..].copy_from_slice(&((nonce.len() as u64) * 8).to_be_bytes());
    g.update_block(&len_block);
    g.finalize().to_bytes()
}

/// Applique le keystream CTR : out[i] = in[i] xor AES_K(ICB + i).
///
/// `output` doit avoir exactement la longueur de `input` ; le dernier
/// bloc partiel ne consomme que le prefixe valide du keystream.
fn gctr(key: &ExpandedKey, icb: &[u8; AES_BLOCK_SIZE], input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len());

    let mut ctr = *icb;
    for (in_chunk, out_chunk) in input.chunks(AES_BLOCK_SIZE).zip(output.chunks_mut(AES_BLOCK_SIZE)) {
        let keystream = encrypt_block(key, &ctr);
        for i in 0..in_chunk.len() {
            out_chunk[i] = in_chunk[i] ^ keystream[i];
        }
        inc32(&mut ctr);
    }
}

/// Calcule le tag complet (16 octets) : GHASH(H, AAD, C) xor AES_K(J0).
fn compute_tag(
    key: &ExpandedKey,
    h: &GfElement,
    j0: &[u8; AES_BLOCK_SIZE],
    aad: &[u8],
    ciphertext: &[u8],
) -> [u8; AES_BLOCK_SIZE] {
    let mut g = Ghash::new(*h);
    g.update_padded(aad);
    g.update_padded(ciphertext);

    // Bloc final : bitlen(AAD) || bitlen(C), chacun en u64 big-endian
    let mut len_block = [0u8; AES_BLOCK_SIZE];
    len_block[..8].copy_from_slice(&((aad.len() as u64) * 8).to_be_bytes());
    len_block[8..].copy_from_slice(&((ciphertext.len() as u64) * 8).to_be_bytes());
    g.update_block(&len_block);

    let mut tag = g.finalize().to_bytes();
    let s0 = encrypt_block(key, j0);
    for i in 0..AES_BLOCK_SIZE {
        tag[i] ^= s0[i];
    }
    tag
}

/// Valide les arguments communs aux deux sens.
fn check_params(nonce: &[u8], tag_len: usize, msg_len: usize) -> CipherResult<()> {
    if nonce.is_empty() {
        return Err(CipherError::InvalidNonceLength { actual: 0 });
    }
    if !(GCM_TAG_MIN..=GCM_TAG_MAX).contains(&tag_len) {
        return Err(CipherError::InvalidTagLength { actual: tag_len });
    }
    if msg_len as u64 > GCM_MAX_MESSAGE_SIZE {
        return Err(CipherError::MessageTooLong { max: GCM_MAX_MESSAGE_SIZE });
    }
    Ok(())
}

/// Chiffre et authentifie en mode GCM.
///
/// Ecrit `plaintext.len()` octets dans `ciphertext` et le tag tronque a
/// `tag.len()` octets (1 a 16) dans `tag`. Les erreurs d'argument sont
/// detectees avant tout travail cryptographique.
pub fn gcm_encrypt(
    key: &ExpandedKey,
    h: &GfElement,
    nonce: &[u8],
    plaintext: &[u8],
    aad: &[u8],
    ciphertext: &mut [u8],
    tag: &mut [u8],
) -> CipherResult<()> {
    check_params(nonce, tag.len(), plaintext.len())?;
    if ciphertext.len() < plaintext.len() {
        return Err(CipherError::BufferTooSmall {
            needed: plaintext.len(),
            actual: ciphertext.len(),
        });
    }

    let j0 = compute_j0(h, nonce);
    let mut icb = j0;
    inc32(&mut icb);

    let ciphertext = &mut ciphertext[..plaintext.len()];
    gctr(key, &icb, plaintext, ciphertext);

    let mut full_tag = compute_tag(key, h, &j0, aad, ciphertext);
    tag.copy_from_slice(&full_tag[..tag.len()]);
    // Les octets non publies du tag tronque restent secrets
    full_tag.zeroize();

    Ok(())
}

/// Verifie puis dechiffre en mode GCM.
///
/// Recalcule le tag attendu a partir du ciphertext et de l'AAD fournis,
/// le compare en temps constant au tag recu, et seulement en cas
/// d'egalite produit le clair. Retourne Ok(false) si le tag est invalide ;
/// le buffer de sortie est alors efface.
pub fn gcm_decrypt(
    key: &ExpandedKey,
    h: &GfElement,
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
    tag: &[u8],
    plaintext: &mut [u8],
) -> CipherResult<bool> {
    check_params(nonce, tag.len(), ciphertext.len())?;
    if plaintext.len() < ciphertext.len() {
        return Err(CipherError::BufferTooSmall {
            needed: ciphertext.len(),
            actual: plaintext.len(),
        });
    }

    let j0 = compute_j0(h, nonce);

    // Verifier AVANT de dechiffrer : aucun clair n'est produit pour un
    // ciphertext non authentique
    let mut expected = compute_tag(key, h, &j0, aad, ciphertext);
    let tag_ok = ct_eq(&expected[..tag.len()], tag);
    expected.zeroize();

    if !tag_ok {
        plaintext.zeroize();
        return Ok(false);
    }

    let mut icb = j0;
    inc32(&mut icb);
    gctr(key, &icb, ciphertext, &mut plaintext[..ciphertext.len()]);

    Ok(true)
}
