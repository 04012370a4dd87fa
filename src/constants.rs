// VaultCipher - Constantes globales
//
// Ce module centralise les tailles et bornes des parametres
// cryptographiques :
// - Tailles AES (bloc, cles 128/192/256)
// - Bornes GCM (nonce recommande, tag 1..16, longueur max de message)
// - Bornes CCM (nonce 7..13, tag pair 4..16, limite d'encodage AAD)
//
// Les constantes sont utilisees par les moteurs gcm/ccm et les wrappers
// aes_gcm/aes_ccm pour garantir la coherence des validations.

/// Taille d'un bloc AES (octets).
pub const AES_BLOCK_SIZE: usize = 16;

/// Taille cle AES-128 (octets).
pub const AES_128_KEY_SIZE: usize = 16;

/// Taille cle AES-192 (octets).
pub const AES_192_KEY_SIZE: usize = 24;

/// Taille cle AES-256 (octets).
pub const AES_256_KEY_SIZE: usize = 32;

/// Taille de nonce GCM recommandee (octets). Toute longueur non nulle est
/// acceptee ; 12 octets est le chemin rapide (pas de GHASH pour J0).
pub const GCM_NONCE_SIZE: usize = 12;

/// Taille de tag GCM par defaut (octets).
pub const GCM_TAG_SIZE: usize = 16;

/// Taille de tag GCM minimale (octets). Tronquer sous 16 octets reduit la
/// resistance aux falsifications et demande un opt-in explicite.
pub const GCM_TAG_MIN: usize = 1;

/// Taille de tag GCM maximale (octets).
pub const GCM_TAG_MAX: usize = 16;

/// Longueur max d'un message GCM : 2^39 - 256 bits = 2^36 - 32 octets
/// (NIST SP 800-38D, section 5.2.1.1).
pub const GCM_MAX_MESSAGE_SIZE: u64 = (1 << 36) - 32;

/// Taille de nonce CCM minimale (octets). L = 15 - nlen doit tenir dans [2,8].
pub const CCM_NONCE_MIN: usize = 7;

/// Taille de nonce CCM maximale (octets).
pub const CCM_NONCE_MAX: usize = 13;

/// Taille de nonce CCM par defaut (octets) : maximise l'espace de nonces.
pub const CCM_NONCE_SIZE: usize = 13;

/// Taille de tag CCM minimale (octets).
pub const CCM_TAG_MIN: usize = 4;

/// Taille de tag CCM maximale (octets).
pub const CCM_TAG_MAX: usize = 16;

/// Taille de tag CCM par defaut (octets).
pub const CCM_TAG_SIZE: usize = 16;

/// Seuil de la forme courte (2 octets) d'encodage de la longueur AAD en CCM.
/// Au-dela, forme longue : 0xFF 0xFE suivi de la longueur sur 32 bits.
pub const CCM_AAD_SHORT_LIMIT: usize = 0xFF00;
