// VaultCipher - Contrat commun des chiffrements authentifies
//
// Le trait `Aead` est l'interface unique exposee par tous les wrappers
// (AES-128/192/256-GCM, AES-128/192/256-CCM) :
// - Tailles fixes : cle, nonce recommande, tag
// - Formes a buffers separes (`encrypt_detached` / `decrypt_detached`) :
//   aucune allocation, l'appelant fournit les sorties ; l'echec
//   d'authentification est un booleen, pas une erreur, car c'est un flot
//   de controle attendu (donnees corrompues ou hostiles)
// - Formes combinees (`encrypt` / `decrypt`) : ciphertext || tag dans un
//   seul Vec, le tag toujours en dernier ; l'echec d'authentification y
//   devient `CipherError::AuthenticationFailed`
//
// Toutes les operations sont pures et sans etat : une instance construite
// une fois peut servir un nombre arbitraire d'appels concurrents (&self,
// aucun champ mutable partage).

use crate::error::{CipherError, CipherResult};

/// Chiffrement authentifie avec donnees associees.
pub trait Aead {
    /// Nom de l'algorithme, par exemple "AES-128-GCM".
    fn name(&self) -> &'static str;

    /// Taille de cle en octets.
    fn key_size(&self) -> usize;

    /// Taille de nonce recommandee en octets (pas forcement la seule
    /// longueur legale ; voir la documentation du mode).
    fn nonce_size(&self) -> usize;

    /// Taille du tag produit en octets.
    fn tag_size(&self) -> usize;

    /// Chiffre `plaintext` et authentifie `(aad, ciphertext)`.
    ///
    /// Ecrit `plaintext.len()` octets dans `ciphertext` et
    /// `self.tag_size()` octets dans `tag`. Les erreurs d'argument sont
    /// signalees avant tout travail.
    fn encrypt_detached(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
    ) -> CipherResult<()>;

    /// Dechiffre `ciphertext` apres ou avant verification du tag selon le
    /// mode (GCM verifie d'abord ; CCM dechiffre d'abord puis efface en
    /// cas d'echec).
    ///
    /// Retourne Ok(true) si le tag est valide et le clair ecrit dans
    /// `plaintext` ; Ok(false) si l'authentification echoue, auquel cas
    /// `plaintext` est efface. Err(_) uniquement pour un argument invalide.
    fn decrypt_detached(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        aad: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
    ) -> CipherResult<bool>;

    /// Forme combinee : retourne ciphertext || tag.
    fn encrypt(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> CipherResult<Vec<u8>> {
        let mut out = vec![0u8; plaintext.len() + self.tag_size()];
        let (ciphertext, tag) = out.split_at_mut(plaintext.len());
        self.encrypt_detached(nonce, plaintext, aad, ciphertext, tag)?;
        Ok(out)
    }

    /// Forme combinee : consomme ciphertext || tag, retourne le clair.
    ///
    /// Echoue avec `AuthenticationFailed` si le tag est invalide, et avec
    /// `BufferTooSmall` si l'entree est plus courte que le tag.
    fn decrypt(&self, nonce: &[u8], ciphertext_and_tag: &[u8], aad: &[u8]) -> CipherResult<Vec<u8>> {
        let tag_size = self.tag_size();
        if ciphertext_and_tag.len() < tag_size {
            return Err(CipherError::BufferTooSmall {
                needed: tag_size,
                actual: ciphertext_and_tag.len(),
            });
        }
        let (ciphertext, tag) = ciphertext_and_tag.split_at(ciphertext_and_tag.len() - tag_size);

        let mut plaintext = vec![0u8; ciphertext.len()];
        if self.decrypt_detached(nonce, ciphertext, aad, tag, &mut plaintext)? {
            Ok(plaintext)
        } else {
            Err(CipherError::AuthenticationFailed)
        }
    }
}
