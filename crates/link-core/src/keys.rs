use alloy_primitives::Address;
use chain_eth::address::address_from_private_key;
use sha3::{Digest, Keccak256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ClaimError;

/// The keypair a link password unlocks.
///
/// Derived on demand and never stored; the private key is wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClaimKeyPair {
    #[zeroize(skip)]
    address: Address,
    private_key: [u8; 32],
}

impl ClaimKeyPair {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }
}

impl std::fmt::Debug for ClaimKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimKeyPair")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Derives the claim keypair for `password`: the private key is
/// `keccak256(utf8(password))`.
///
/// Any password, including the empty one, yields the same keypair every time.
pub fn derive_key_pair(password: &str) -> Result<ClaimKeyPair, ClaimError> {
    let mut private_key: [u8; 32] = Keccak256::digest(password.as_bytes()).into();
    let address = match address_from_private_key(&private_key) {
        Ok(address) => address,
        Err(e) => {
            private_key.zeroize();
            return Err(e.into());
        }
    };
    Ok(ClaimKeyPair {
        address,
        private_key,
    })
}
