// VaultCipher - Comparaison en temps constant
//
// La comparaison des tags d'authentification ne doit pas s'interrompre au
// premier octet different : un early-exit donnerait a un attaquant un
// oracle de timing lui permettant de forger un tag octet par octet.
//
// L'egalite octet a octet est deleguee a la crate `subtle`
// (ConstantTimeEq) ; seule la comparaison des longueurs, qui sont
// publiques, peut brancher.

use subtle::ConstantTimeEq;

/// Compare deux slices d'octets en temps constant.
///
/// Retourne false si les longueurs different (les longueurs de tag sont
/// publiques, cette branche ne fuit rien de secret). Pour des longueurs
/// egales, le temps d'execution ne depend pas de la position du premier
/// octet different.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
