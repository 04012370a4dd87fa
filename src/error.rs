// VaultCipher - Types d'erreur centralises
//
// Ce module definit l'enumeration `CipherError` et le type alias
// `CipherResult<T>` utilises dans toute la bibliotheque.
//
// # Deux canaux distincts
// - Erreurs d'argument (mauvaise longueur de cle, nonce ou tag hors bornes,
//   buffer trop petit, message trop long) : mauvais usage par l'appelant,
//   detecte AVANT tout travail cryptographique, propage immediatement.
// - Echec d'authentification (tag invalide au dechiffrement) : resultat
//   attendu face a des donnees corrompues ou hostiles. Les APIs a buffers
//   le signalent par un booleen (Ok(false)) ; seules les APIs combinees
//   (ciphertext || tag) le remontent comme `AuthenticationFailed`.
//
// Le prefixe entre crochets de chaque message suit la convention de
// diagnostic des logs.

use thiserror::Error;

/// Enumeration de toutes les erreurs possibles de VaultCipher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Longueur de cle invalide pour l'algorithme choisi.
    #[error("[Cle] longueur invalide : {actual} octets (attendu {expected})")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Longueur de nonce hors des bornes legales du mode.
    #[error("[Nonce] longueur invalide : {actual} octets")]
    InvalidNonceLength { actual: usize },

    /// Longueur de tag hors bornes, ou impaire pour CCM.
    #[error("[Tag] longueur invalide : {actual} octets")]
    InvalidTagLength { actual: usize },

    /// Buffer de sortie fourni par l'appelant trop petit.
    #[error("[Buffer] sortie trop petite : {actual} octets (requis {needed})")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Message plus long que la capacite du champ de longueur du mode.
    #[error("[Message] longueur au-dela de la capacite du mode ({max} octets max)")]
    MessageTooLong { max: u64 },

    /// Donnees associees non representables dans l'encodage de longueur.
    #[error("[AAD] longueur non encodable")]
    AadTooLong,

    /// Tag d'authentification invalide au dechiffrement.
    #[error("[Auth] echec de verification du tag")]
    AuthenticationFailed,
}

/// Type Result specialise pour VaultCipher.
pub type CipherResult<T> = Result<T, CipherError>;
