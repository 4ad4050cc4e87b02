use alloy_primitives::{Address, B256};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::address::address_from_public_key;
use crate::error::EthError;

/// A 65-byte recoverable secp256k1 signature laid out as `r || s || v`,
/// with `v` in `{27, 28}` as `ecrecover` expects.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature(pub [u8; 65]);

impl RecoverableSignature {
    /// Parses a 65-byte `r || s || v` signature. `v` may be given as
    /// `0/1` or `27/28`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EthError> {
        let raw: [u8; 65] = bytes.try_into().map_err(|_| {
            EthError::InvalidSignature(format!("expected 65 bytes, got {}", bytes.len()))
        })?;

        let mut sig = Self(raw);
        match sig.0[64] {
            0 | 1 => sig.0[64] += 27,
            27 | 28 => {}
            v => return Err(EthError::InvalidSignature(format!("invalid v: {v}"))),
        }
        Ok(sig)
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The recovery byte, 27 or 28.
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// 0x-prefixed lowercase hex, the form relayers and contracts accept.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}

/// EIP-191 `personal_sign` hash of `message`:
/// `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`.
pub fn hash_message(message: &[u8]) -> B256 {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    B256::from_slice(&hasher.finalize())
}

/// Signs a raw 32-byte digest without any prefixing.
pub fn sign_prehash(
    digest: &B256,
    private_key: &[u8; 32],
) -> Result<RecoverableSignature, EthError> {
    // Create the signing key, wiping the stack copy of the key bytes.
    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    let signing_key = signing_key?;

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(digest.as_slice())
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let mut sig = [0u8; 65];
    sig[..32].copy_from_slice(&signature.r().to_bytes());
    sig[32..64].copy_from_slice(&signature.s().to_bytes());
    sig[64] = recovery_id.is_y_odd() as u8 + 27;
    Ok(RecoverableSignature(sig))
}

/// Recovers the address that produced `signature` over `digest`.
pub fn recover_signer(
    digest: &B256,
    signature: &RecoverableSignature,
) -> Result<Address, EthError> {
    let sig = Signature::from_slice(&signature.0[..64])
        .map_err(|e| EthError::InvalidSignature(e.to_string()))?;
    let recovery_id = signature
        .v()
        .checked_sub(27)
        .and_then(RecoveryId::from_byte)
        .ok_or_else(|| EthError::InvalidSignature(format!("invalid v: {}", signature.v())))?;

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|e| EthError::RecoveryError(e.to_string()))?;
    Ok(address_from_public_key(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::address_from_private_key;

    /// Well-known test private key (DO NOT use on mainnet).
    const TEST_PRIVKEY: [u8; 32] = {
        let mut key = [0u8; 32];
        key[31] = 1;
        key
    };

    #[test]
    fn hash_message_matches_manual_prefixing() {
        let message = [0xABu8; 32];
        let mut manual = b"\x19Ethereum Signed Message:\n32".to_vec();
        manual.extend_from_slice(&message);

        assert_eq!(hash_message(&message), B256::from_slice(&Keccak256::digest(&manual)));
    }

    #[test]
    fn hash_message_length_is_decimal() {
        let message = vec![0u8; 100];
        let mut manual = b"\x19Ethereum Signed Message:\n100".to_vec();
        manual.extend_from_slice(&message);

        assert_eq!(hash_message(&message), B256::from_slice(&Keccak256::digest(&manual)));
    }

    #[test]
    fn sign_prehash_is_deterministic() {
        let digest = B256::repeat_byte(0x11);
        let a = sign_prehash(&digest, &TEST_PRIVKEY).unwrap();
        let b = sign_prehash(&digest, &TEST_PRIVKEY).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sign_prehash_v_is_27_or_28() {
        for byte in 0..8u8 {
            let sig = sign_prehash(&B256::repeat_byte(byte), &TEST_PRIVKEY).unwrap();
            assert!(sig.v() == 27 || sig.v() == 28);
        }
    }

    #[test]
    fn recover_signer_round_trip() {
        let digest = B256::repeat_byte(0x5A);
        let sig = sign_prehash(&digest, &TEST_PRIVKEY).unwrap();

        let signer = recover_signer(&digest, &sig).unwrap();
        assert_eq!(signer, address_from_private_key(&TEST_PRIVKEY).unwrap());
    }

    #[test]
    fn recover_signer_wrong_digest_gives_other_address() {
        let sig = sign_prehash(&B256::repeat_byte(1), &TEST_PRIVKEY).unwrap();
        let signer = recover_signer(&B256::repeat_byte(2), &sig);

        let expected = address_from_private_key(&TEST_PRIVKEY).unwrap();
        assert!(signer.map(|s| s != expected).unwrap_or(true));
    }

    #[test]
    fn sign_with_zero_key_errors() {
        let result = sign_prehash(&B256::ZERO, &[0u8; 32]);
        assert!(matches!(result, Err(EthError::InvalidPrivateKey(_))));
    }

    #[test]
    fn signature_from_slice_normalizes_v() {
        let mut raw = [0u8; 65];
        raw[64] = 1;
        assert_eq!(RecoverableSignature::from_slice(&raw).unwrap().v(), 28);

        raw[64] = 27;
        assert_eq!(RecoverableSignature::from_slice(&raw).unwrap().v(), 27);

        raw[64] = 5;
        assert!(RecoverableSignature::from_slice(&raw).is_err());
        assert!(RecoverableSignature::from_slice(&raw[..64]).is_err());
    }

    #[test]
    fn signature_hex_is_132_chars() {
        let sig = sign_prehash(&B256::repeat_byte(3), &TEST_PRIVKEY).unwrap();
        let hex = sig.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 2 + 130);
    }
}
