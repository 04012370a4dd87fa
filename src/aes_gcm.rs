// VaultCipher - Wrappers AES-GCM par taille de cle
// Reference : NIST SP 800-38D
//
// Chaque wrapper fixe une taille de cle (128, 192 ou 256 bits), expanse
// la cle une seule fois a la construction et derive la sous-cle GHASH
// H = AES_K(0^128). Les appels encrypt/decrypt sont ensuite purs et sans
// etat : cles de round et H sont immuables et partageables entre threads
// sans verrou.
//
// # Tailles
// - Nonce : 12 octets recommandes (chemin rapide) ; toute longueur non
//   nulle est acceptee, les autres longueurs passant par GHASH
// - Tag : 16 octets par defaut ; troncature de 1 a 15 octets possible via
//   `with_tag_size`, au prix d'une resistance aux falsifications reduite
//   (opt-in explicite, voir SP 800-38D annexe C)
//
// # Securite
// La sous-cle H et les cles de round sont effacees a la liberation du
// wrapper (zeroize).

use crate::aead::Aead;
use crate::aes::ExpandedKey;
use crate::constants::{GCM_NONCE_SIZE, GCM_TAG_MAX, GCM_TAG_MIN, GCM_TAG_SIZE};
use crate::error::{CipherError, CipherResult};
use crate::gcm::{derive_h, gcm_decrypt, gcm_encrypt};
use crate::ghash::GfElement;
use std::fmt;
use zeroize::Zeroize;

/// AES-GCM generique sur la taille de cle (en octets).
///
/// Utiliser les alias `Aes128Gcm`, `Aes192Gcm` et `Aes256Gcm` ; le
/// parametre const monomorphise le wrapper sans dispatch dynamique.
pub struct AesGcm<const KEY_SIZE: usize> {
    key: ExpandedKey,
    h: GfElement,
    tag_size: usize,
}

/// AES-128-GCM.
pub type Aes128Gcm = AesGcm<16>;
/// AES-192-GCM.
pub type Aes192Gcm = AesGcm<24>;
/// AES-256-GCM.
pub type Aes256Gcm = AesGcm<32>;

impl<const KEY_SIZE: usize> AesGcm<KEY_SIZE> {
    /// Construit le wrapper avec le tag standard de 16 octets.
    pub fn new(key: &[u8]) -> CipherResult<Self> {
        Self::with_tag_size(key, GCM_TAG_SIZE)
    }

    /// Construit le wrapper avec une taille de tag explicite (1 a 16).
    ///
    /// Un tag tronque sous 16 octets reduit la resistance aux
    /// falsifications ; ce constructeur est l'opt-in explicite exige pour
    /// y recourir.
    pub fn with_tag_size(key: &[u8], tag_size: usize) -> CipherResult<Self> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }
        if !(GCM_TAG_MIN..=GCM_TAG_MAX).contains(&tag_size) {
            return Err(CipherError::InvalidTagLength { actual: tag_size });
        }

        let key = ExpandedKey::new(key)?;
        let h = derive_h(&key);
        Ok(Self { key, h, tag_size })
    }
}

impl<const KEY_SIZE: usize> fmt::Debug for AesGcm<KEY_SIZE> {
    /// N'expose jamais le materiel de cle (cles de round, sous-cle H).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcm")
            .field("algorithm", &self.name())
            .field("tag_size", &self.tag_size)
            .finish_non_exhaustive()
    }
}

impl<const KEY_SIZE: usize> Drop for AesGcm<KEY_SIZE> {
    /// Efface la sous-cle H ; les cles de round s'effacent elles-memes.
    fn drop(&mut self) {
        self.h.zeroize();
    }
}

impl<const KEY_SIZE: usize> Aead for AesGcm<KEY_SIZE> {
    fn name(&self) -> &'static str {
        match KEY_SIZE {
            16 => "AES-128-GCM",
            24 => "AES-192-GCM",
            32 => "AES-256-GCM",
            _ => "AES-GCM",
        }
    }

    fn key_size(&self) -> usize {
        KEY_SIZE
    }

    fn nonce_size(&self) -> usize {
        GCM_NONCE_SIZE
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
        gcm_encrypt(&self.key, &self.h, nonce, plaintext, aad, ciphertext, tag)
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
        gcm_decrypt(&self.key, &self.h, nonce, ciphertext, aad, tag, plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // Vecteurs de "The Galois/Counter Mode of Operation", annexe B
    // (repris par NIST SP 800-38D).

    #[test]
    fn test_nist_case_1_empty() {
        let gcm = Aes128Gcm::new(&[0u8; 16]).unwrap();
        let out = gcm.encrypt(&[0u8; 12], b"", b"").unwrap();
        assert_eq!(out, hex!("58e2fccefa7e3061367f1d57a4e7455a"));
    }

    #[test]
    fn test_nist_case_2_single_block() {
        let gcm = Aes128Gcm::new(&[0u8; 16]).unwrap();
        let out = gcm.encrypt(&[0u8; 12], &[0u8; 16], b"").unwrap();
        assert_eq!(&out[..16], hex!("0388dace60b6a392f328c2b971b2fe78"));
        assert_eq!(&out[16..], hex!("ab6e47d42cec13bdf53a67b21257bddf"));
    }

    #[test]
    fn test_nist_case_3_four_blocks() {
        let key = hex!("feffe9928665731c6d6a8f9467308308");
        let nonce = hex!("cafebabefacedbaddecaf888");
        let plaintext = hex!(
            "d9313225f88406e5a55909c5aff5269a"
            "86a7a9531534f7da2e4c303d8a318a72"
            "1c3c0c95956809532fcf0e2449a6b525"
            "b16aedf5aa0de657ba637b391aafd255"
        );
        let gcm = Aes128Gcm::new(&key).unwrap();
        let out = gcm.encrypt(&nonce, &plaintext, b"").unwrap();
        assert_eq!(
            &out[..64],
            hex!(
                "42831ec2217774244b7221b784d0d49c"
                "e3aa212f2c02a4e035c17e2329aca12e"
                "21d514b25466931c7d8f6a5aac84aa05"
                "1ba30b396a0aac973d58e091473f5985"
            )
        );
        assert_eq!(&out[64..], hex!("4d5c2af327cd64a62cf35abd2ba6fab4"));

        let back = gcm.decrypt(&nonce, &out, b"").unwrap();
        assert_eq!(back, plaintext);
    }

    #[test]
    fn test_nist_case_4_with_aad() {
        let key = hex!("feffe9928665731c6d6a8f9467308308");
        let nonce = hex!("cafebabefacedbaddecaf888");
        let plaintext = hex!(
            "d9313225f88406e5a55909c5aff5269a"
            "86a7a9531534f7da2e4c303d8a318a72"
            "1c3c0c95956809532fcf0e2449a6b525"
            "b16aedf5aa0de657ba637b39"
        );
        let aad = hex!("feedfacedeadbeeffeedfacedeadbeefabaddad2");
        let gcm = Aes128Gcm::new(&key).unwrap();
        let out = gcm.encrypt(&nonce, &plaintext, &aad).unwrap();
        assert_eq!(
            &out[..60],
            hex!(
                "42831ec2217774244b7221b784d0d49c"
                "e3aa212f2c02a4e035c17e2329aca12e"
                "21d514b25466931c7d8f6a5aac84aa05"
                "1ba30b396a0aac973d58e091"
            )
        );
        assert_eq!(&out[60..], hex!("5bc94fbc3221a5db94fae95ae7121a47"));
    }

    #[test]
    fn test_nist_case_5_short_nonce() {
        // Nonce de 8 octets : exerce le chemin general de derivation J0
        let key = hex!("feffe9928665731c6d6a8f9467308308");
        let nonce = hex!("cafebabefacedbad");
        let plaintext = hex!(
            "d9313225f88406e5a55909c5aff5269a"
            "86a7a9531534f7da2e4c303d8a318a72"
            "1c3c0c95956809532fcf0e2449a6b525"
            "b16aedf5aa0de657ba637b39"
        );
        let aad = hex!("feedfacedeadbeeffeedfacedeadbeefabaddad2");
        let gcm = Aes128Gcm::new(&key).unwrap();
        let out = gcm.encrypt(&nonce, &plaintext, &aad).unwrap();
        assert_eq!(
            &out[..60],
            hex!(
                "61353b4c2806934a777ff51fa22a4755"
                "699b2a714fcdc6f83766e5f97b6c7423"
                "73806900e49f24b22b097544d4896b42"
                "4989b5e1ebac0f07c23f4598"
            )
        );
        assert_eq!(&out[60..], hex!("3612d2e79e3b0785561be14aaca2fccb"));
    }

    #[test]
    fn test_nist_aes192_vectors() {
        let gcm = Aes192Gcm::new(&[0u8; 24]).unwrap();
        let out = gcm.encrypt(&[0u8; 12], b"", b"").unwrap();
        assert_eq!(out, hex!("cd33b28ac773f74ba00ed1f312572435"));

        let out = gcm.encrypt(&[0u8; 12], &[0u8; 16], b"").unwrap();
        assert_eq!(&out[..16], hex!("98e7247c07f0fe411c267e4384b0f600"));
        assert_eq!(&out[16..], hex!("2ff58d80033927ab8ef4d4587514f0fb"));
    }

    #[test]
    fn test_nist_aes256_vectors() {
        let gcm = Aes256Gcm::new(&[0u8; 32]).unwrap();
        let out = gcm.encrypt(&[0u8; 12], b"", b"").unwrap();
        assert_eq!(out, hex!("530f8afbc74536b9a963b4f1c4cb738b"));

        let out = gcm.encrypt(&[0u8; 12], &[0u8; 16], b"").unwrap();
        assert_eq!(&out[..16], hex!("cea7403d4d606b6e074ec5d3baf39d18"));
        assert_eq!(&out[16..], hex!("d0d1c8a799996bf0265b98b5d48ab919"));
    }

    #[test]
    fn test_tamper_detection_every_bit_region() {
        let gcm = Aes256Gcm::new(&[0x10u8; 32]).unwrap();
        let nonce = [3u8; 12];
        let aad = b"contexte authentifie";
        let out = gcm.encrypt(&nonce, b"message a proteger", aad).unwrap();

        // Un bit du ciphertext
        let mut bad = out.clone();
        bad[0] ^= 0x01;
        assert_eq!(gcm.decrypt(&nonce, &bad, aad), Err(CipherError::AuthenticationFailed));

        // Un bit du tag
        let mut bad = out.clone();
        let last = bad.len() - 1;
        bad[last] ^= 0x80;
        assert_eq!(gcm.decrypt(&nonce, &bad, aad), Err(CipherError::AuthenticationFailed));

        // Un bit de l'AAD
        let mut bad_aad = aad.to_vec();
        bad_aad[4] ^= 0x10;
        assert_eq!(gcm.decrypt(&nonce, &out, &bad_aad), Err(CipherError::AuthenticationFailed));

        // Intact : succes
        assert_eq!(gcm.decrypt(&nonce, &out, aad).unwrap(), b"message a proteger");
    }

    #[test]
    fn test_deterministic() {
        let gcm = Aes128Gcm::new(&[0x21u8; 16]).unwrap();
        let a = gcm.encrypt(&[9u8; 12], b"payload", b"aad").unwrap();
        let b = gcm.encrypt(&[9u8; 12], b"payload", b"aad").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncated_tag_opt_in() {
        let gcm = Aes128Gcm::with_tag_size(&[0x03u8; 16], 12).unwrap();
        assert_eq!(gcm.tag_size(), 12);
        let out = gcm.encrypt(&[1u8; 12], b"abc", b"").unwrap();
        assert_eq!(out.len(), 3 + 12);
        assert_eq!(gcm.decrypt(&[1u8; 12], &out, b"").unwrap(), b"abc");

        // Tailles de tag hors bornes refusees a la construction
        assert!(Aes128Gcm::with_tag_size(&[0u8; 16], 0).is_err());
        assert!(Aes128Gcm::with_tag_size(&[0u8; 16], 17).is_err());
    }

    #[test]
    fn test_wrong_key_length() {
        assert_eq!(
            Aes128Gcm::new(&[0u8; 24]).unwrap_err(),
            CipherError::InvalidKeyLength { expected: 16, actual: 24 }
        );
        assert!(Aes256Gcm::new(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_names_and_sizes() {
        let g128 = Aes128Gcm::new(&[0u8; 16]).unwrap();
        let g192 = Aes192Gcm::new(&[0u8; 24]).unwrap();
        let g256 = Aes256Gcm::new(&[0u8; 32]).unwrap();
        assert_eq!(g128.name(), "AES-128-GCM");
        assert_eq!(g192.name(), "AES-192-GCM");
        assert_eq!(g256.name(), "AES-256-GCM");
        assert_eq!(g128.key_size(), 16);
        assert_eq!(g192.key_size(), 24);
        assert_eq!(g256.key_size(), 32);
        assert_eq!(g128.nonce_size(), 12);
        assert_eq!(g128.tag_size(), 16);
    }

    #[test]
    fn test_debug_redacts_key_material() {
        // Le wrapper doit etre Debug (diagnostics, unwrap_err dans les
        // tests) sans jamais imprimer cle, cles de round ou sous-cle H
        let key = [0xB7u8; 32];
        let gcm = Aes256Gcm::new(&key).unwrap();
        let dump = format!("{:?}", gcm);
        assert!(dump.contains("AES-256-GCM"));
        assert!(!dump.contains("b7"));
        assert!(!dump.contains("183")); // 0xB7 en decimal
    }

    #[test]
    fn test_combined_input_shorter_than_tag() {
        let gcm = Aes128Gcm::new(&[0u8; 16]).unwrap();
        assert_eq!(
            gcm.decrypt(&[0u8; 12], &[0u8; 15], b""),
            Err(CipherError::BufferTooSmall { needed: 16, actual: 15 })
        );
    }

    #[test]
    fn test_concurrent_calls_share_instance() {
        // Cles de round et H immuables : une meme instance sert plusieurs
        // threads sans verrou
        use std::sync::Arc;

        let gcm = Arc::new(Aes256Gcm::new(&[0x44u8; 32]).unwrap());
        let handles: Vec<_> = (0u8..4)
            .map(|i| {
                let gcm = Arc::clone(&gcm);
                std::thread::spawn(move || {
                    let nonce = [i; 12];
                    let out = gcm.encrypt(&nonce, b"parallele", b"").unwrap();
                    gcm.decrypt(&nonce, &out, b"").unwrap()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), b"parallele");
        }
    }
}
