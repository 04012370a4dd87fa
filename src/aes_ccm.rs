// VaultCipher - Wrappers AES-CCM par taille de cle
// Reference : NIST SP 800-38C, RFC 3610
//
// Chaque wrapper fixe une taille de cle (128, 192 ou 256 bits) et
// expanse la cle une seule fois a la construction. CCM n'a pas de
// sous-cle derivee : seul le key schedule est conserve.
//
// # Tailles
// - Nonce : 7 a 13 octets, passe a chaque appel ; 13 octets par defaut
//   (L = 2, messages jusqu'a 65535 octets). Un nonce plus court agrandit
//   la capacite du champ de longueur au detriment de l'espace de nonces
// - Tag : valeur paire de 4 a 16 octets, 16 par defaut
//
// # Securite
// Les cles de round sont effacees a la liberation du wrapper.

use crate::aead::Aead;
use crate::aes::ExpandedKey;
use crate::ccm::{ccm_decrypt, ccm_encrypt};
use crate::constants::{CCM_NONCE_SIZE, CCM_TAG_MAX, CCM_TAG_MIN, CCM_TAG_SIZE};
use crate::error::{CipherError, CipherResult};
use std::fmt;

/// AES-CCM generique sur la taille de cle (en octets).
///
/// Utiliser les alias `Aes128Ccm`, `Aes192Ccm` et `Aes256Ccm`.
pub struct AesCcm<const KEY_SIZE: usize> {
    key: ExpandedKey,
    tag_size: usize,
}

/// AES-128-CCM.
pub type Aes128Ccm = AesCcm<16>;
/// AES-192-CCM.
pub type Aes192Ccm = AesCcm<24>;
/// AES-256-CCM.
pub type Aes256Ccm = AesCcm<32>;

impl<const KEY_SIZE: usize> AesCcm<KEY_SIZE> {
    /// Construit le wrapper avec le tag standard de 16 octets.
    pub fn new(key: &[u8]) -> CipherResult<Self> {
        Self::with_tag_size(key, CCM_TAG_SIZE)
    }

    /// Construit le wrapper avec une taille de tag explicite
    /// (paire, de 4 a 16 octets).
    pub fn with_tag_size(key: &[u8], tag_size: usize) -> CipherResult<Self> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }
        if !(CCM_TAG_MIN..=CCM_TAG_MAX).contains(&tag_size) || tag_size % 2 != 0 {
            return Err(CipherError::InvalidTagLength { actual: tag_size });
        }

        let key = ExpandedKey::new(key)?;
        Ok(Self { key, tag_size })
    }
}

impl<const KEY_SIZE: usize> fmt::Debug for AesCcm<KEY_SIZE> {
    /// N'expose jamais le materiel de cle.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesCcm")
            .field("algorithm", &self.name())
            .field("tag_size", &self.tag_size)
            .finish_non_exhaustive()
    }
}

impl<const KEY_SIZE: usize> Aead for AesCcm<KEY_SIZE> {
    fn name(&self) -> &'static str {
        match KEY_SIZE {
            16 => "AES-128-CCM",
            24 => "AES-192-CCM",
            32 => "AES-256-CCM",
            _ => "AES-CCM",
        }
    }

    fn key_size(&self) -> usize {
        KEY_SIZE
    }

    fn nonce_size(&self) -> usize {
        CCM_NONCE_SIZE
    }

    fn tag_size(&self) -> usize {
        self.tag_size
    }

    fn encrypt_detached(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
    ) -> CipherResult<()> {
        if tag.len() != self.tag_size {
            return Err(CipherError::InvalidTagLength { actual: tag.len() });
        }
        ccm_encrypt(&self.key, nonce, plaintext, aad, ciphertext, tag)
    }

    fn decrypt_detached(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        aad: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
    ) -> CipherResult<bool> {
        if tag.len() != self.tag_size {
            return Err(CipherError::InvalidTagLength { actual: tag.len() });
        }
        ccm_decrypt(&self.key, nonce, ciphertext, aad, tag, plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_sp800_38c_example_1() {
        let key = hex!("404142434445464748494a4b4c4d4e4f");
        let nonce = hex!("10111213141516");
        let aad = hex!("0001020304050607");
        let plaintext = hex!("20212223");
        let ccm = Aes128Ccm::with_tag_size(&key, 4).unwrap();
        let out = ccm.encrypt(&nonce, &plaintext, &aad).unwrap();
        assert_eq!(out, hex!("7162015b4dac255d"));

        let back = ccm.decrypt(&nonce, &out, &aad).unwrap();
        assert_eq!(back, plaintext);
    }

    #[test]
    fn test_sp800_38c_example_2() {
        let key = hex!("404142434445464748494a4b4c4d4e4f");
        let nonce = hex!("1011121314151617");
        let aad = hex!("000102030405060708090a0b0c0d0e0f");
        let plaintext = hex!("202122232425262728292a2b2c2d2e2f");
        let ccm = Aes128Ccm::with_tag_size(&key, 6).unwrap();
        let out = ccm.encrypt(&nonce, &plaintext, &aad).unwrap();
        assert_eq!(&out[..16], hex!("d2a1f0e051ea5f62081a7792073d593d"));
        assert_eq!(&out[16..], hex!("1fc64fbfaccd"));
    }

    #[test]
    fn test_sp800_38c_example_3() {
        let key = hex!("404142434445464748494a4b4c4d4e4f");
        let nonce = hex!("101112131415161718191a1b");
        let aad = hex!("000102030405060708090a0b0c0d0e0f10111213");
        let plaintext = hex!("202122232425262728292a2b2c2d2e2f3031323334353637");
        let ccm = Aes128Ccm::with_tag_size(&key, 8).unwrap();
        let out = ccm.encrypt(&nonce, &plaintext, &aad).unwrap();
        assert_eq!(
            out,
            hex!("e3b201a9f5b71a7a9b1ceaeccd97e70b6176aad9a4428aa5484392fbc1b09951")
        );
    }

    #[test]
    fn test_rfc3610_packet_vector_1() {
        let key = hex!("c0c1c2c3c4c5c6c7c8c9cacbcccdcecf");
        let nonce = hex!("00000003020100a0a1a2a3a4a5");
        let aad = hex!("0001020304050607");
        let plaintext = hex!("08090a0b0c0d0e0f101112131415161718191a1b1c1d1e");
        let ccm = Aes128Ccm::with_tag_size(&key, 8).unwrap();
        let out = ccm.encrypt(&nonce, &plaintext, &aad).unwrap();
        assert_eq!(
            &out[..23],
            hex!("588c979a61c663d2f066d0c2c0f989806d5f6b61dac384")
        );
        assert_eq!(&out[23..], hex!("17e8d12cfdf926e0"));

        let back = ccm.decrypt(&nonce, &out, &aad).unwrap();
        assert_eq!(back, plaintext);
    }

    #[test]
    fn test_roundtrip_aes192_aes256() {
        let plaintext = b"confidentiel, toutes tailles de cle";
        let aad = b"version=1";
        let nonce = [0x9Du8; 13];

        let c192 = Aes192Ccm::new(&[0x18u8; 24]).unwrap();
        let out = c192.encrypt(&nonce, plaintext, aad).unwrap();
        assert_eq!(c192.decrypt(&nonce, &out, aad).unwrap(), plaintext);

        let c256 = Aes256Ccm::new(&[0x27u8; 32]).unwrap();
        let out = c256.encrypt(&nonce, plaintext, aad).unwrap();
        assert_eq!(c256.decrypt(&nonce, &out, aad).unwrap(), plaintext);
    }

    #[test]
    fn test_tamper_detection() {
        let ccm = Aes256Ccm::new(&[0x61u8; 32]).unwrap();
        let nonce = [4u8; 13];
        let aad = b"en-tete";
        let out = ccm.encrypt(&nonce, b"charge utile", aad).unwrap();

        let mut bad = out.clone();
        bad[2] ^= 0x04;
        assert_eq!(ccm.decrypt(&nonce, &bad, aad), Err(CipherError::AuthenticationFailed));

        let mut bad = out.clone();
        let last = bad.len() - 1;
        bad[last] ^= 0x01;
        assert_eq!(ccm.decrypt(&nonce, &bad, aad), Err(CipherError::AuthenticationFailed));

        assert_eq!(ccm.decrypt(&nonce, &out, b"autre aad"), Err(CipherError::AuthenticationFailed));
        assert_eq!(ccm.decrypt(&nonce, &out, aad).unwrap(), b"charge utile");
    }

    #[test]
    fn test_empty_plaintext() {
        let ccm = Aes128Ccm::new(&[0x55u8; 16]).unwrap();
        let nonce = [6u8; 13];
        let out = ccm.encrypt(&nonce, b"", b"meta").unwrap();
        assert_eq!(out.len(), 16); // tag seul
        assert_eq!(ccm.decrypt(&nonce, &out, b"meta").unwrap(), b"");
    }

    #[test]
    fn test_deterministic() {
        let ccm = Aes128Ccm::new(&[0x08u8; 16]).unwrap();
        let a = ccm.encrypt(&[1u8; 13], b"payload", b"aad").unwrap();
        let b = ccm.encrypt(&[1u8; 13], b"payload", b"aad").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_constructor_validation() {
        assert_eq!(
            Aes128Ccm::new(&[0u8; 32]).unwrap_err(),
            CipherError::InvalidKeyLength { expected: 16, actual: 32 }
        );
        // Tag impair ou hors bornes
        for bad in [0usize, 2, 3, 7, 9, 17] {
            assert!(Aes128Ccm::with_tag_size(&[0u8; 16], bad).is_err());
        }
        for good in [4usize, 6, 8, 10, 12, 14, 16] {
            assert!(Aes128Ccm::with_tag_size(&[0u8; 16], good).is_ok());
        }
    }

    #[test]
    fn test_names_and_sizes() {
        let c = Aes192Ccm::with_tag_size(&[0u8; 24], 10).unwrap();
        assert_eq!(c.name(), "AES-192-CCM");
        assert_eq!(c.key_size(), 24);
        assert_eq!(c.nonce_size(), 13);
        assert_eq!(c.tag_size(), 10);
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = [0xB7u8; 16];
        let ccm = Aes128Ccm::new(&key).unwrap();
        let dump = format!("{:?}", ccm);
        assert!(dump.contains("AES-128-CCM"));
        assert!(!dump.contains("b7"));
        assert!(!dump.contains("183")); // 0xB7 en decimal
    }

    #[test]
    fn test_detached_tag_buffer_must_match() {
        let ccm = Aes128Ccm::with_tag_size(&[0u8; 16], 8).unwrap();
        let mut ct = [0u8; 4];
        let mut tag16 = [0u8; 16];
        assert_eq!(
            ccm.encrypt_detached(&[0u8; 13], b"abcd", b"", &mut ct, &mut tag16),
            Err(CipherError::InvalidTagLength { actual: 16 })
        );
    }
}
