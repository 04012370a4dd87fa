// VaultCipher - Arbre de modules (crate library)
//
// Bibliotheque de primitives AEAD (Authenticated Encryption with
// Associated Data) en pur Rust : AES-GCM (NIST SP 800-38D) et AES-CCM
// (NIST SP 800-38C), au-dessus d'un chiffrement par bloc AES (FIPS 197)
// implemente de zero.
//
// # Modules
// - `aead`      : contrat commun des chiffrements authentifies (trait Aead)
// - `aes`       : chiffrement par bloc AES-128/192/256 et key schedule
// - `aes_ccm`   : wrappers AES-128/192/256-CCM
// - `aes_gcm`   : wrappers AES-128/192/256-GCM
// - `ccm`       : moteur CCM (B0, CBC-MAC, CTR, encodage de longueur AAD)
// - `constants` : tailles et bornes des parametres
// - `ct`        : comparaison de tags en temps constant
// - `error`     : types d'erreur centralises (CipherError, CipherResult)
// - `gcm`       : moteur GCM (GCTR, derivation J0)
// - `ghash`     : arithmetique GF(2^128) et accumulateur GHASH
//
// # Securite
// - Verification des tags en temps constant (crate `subtle`)
// - Secrets derives de la cle (cles de round, sous-cle H) effaces a la
//   liberation (crate `zeroize`)
// - GCM verifie le tag AVANT de dechiffrer ; CCM dechiffre d'abord (le MAC
//   porte sur le clair) mais efface le clair produit si le tag est invalide
// - Le nonce DOIT etre unique pour chaque chiffrement avec la meme cle ;
//   cette unicite est de la responsabilite de l'appelant

/// Contrat commun des chiffrements authentifies.
pub mod aead;
/// Chiffrement par bloc AES-128/192/256 (FIPS 197).
pub mod aes;
/// Wrappers AES-CCM par taille de cle.
pub mod aes_ccm;
/// Wrappers AES-GCM par taille de cle.
pub mod aes_gcm;
/// Moteur CCM : formatage B0, CBC-MAC, chiffrement CTR.
pub mod ccm;
/// Constantes globales (tailles de bloc, de cle, de nonce, de tag).
pub mod constants;
/// Comparaison en temps constant.
pub mod ct;
/// Types d'erreur centralises.
pub mod error;
/// Moteur GCM : GCTR, derivation J0, calcul du tag.
pub mod gcm;
/// Multiplication GF(2^128) et accumulateur GHASH.
pub mod ghash;

pub use aead::Aead;
pub use aes_ccm::{Aes128Ccm, Aes192Ccm, Aes256Ccm, AesCcm};
pub use aes_gcm::{Aes128Gcm, Aes192Gcm, Aes256Gcm, AesGcm};
pub use error::{CipherError, CipherResult};
