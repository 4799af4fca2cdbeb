use std::{str::FromStr, sync::Arc, thread};

use proptest::prelude::*;
use tezos_keys::{
    error::Error,
    mnemonic, Curve,
    Curve::{Bls12_381, Ed25519, NistP256, Secp256k1},
    Key, PrivateKey, PublicKey, Signature,
};
use zeroize::Zeroize;

use fixtures::*;

mod fixtures {
    use super::*;

    pub const MESSAGE: &str = "test message";

    pub const PHRASE: &str = "abandon abandon abandon abandon abandon abandon \
                              abandon abandon abandon abandon abandon about";

    pub struct TestData {
        pub curve: Curve,
        pub private_key: &'static str,
        pub public_key: &'static str,
        pub public_key_hash: &'static str,
        pub signature: &'static str,
        pub address_prefix: &'static [u8],
        pub public_key_prefix: &'static [u8],
        pub private_key_prefix: &'static [u8],
        pub signature_prefix: &'static [u8],
    }

    pub static TEST_ED25519: TestData = TestData {
        curve: Ed25519,
        private_key: "9D61B19DEFFD5A60BA844AF492EC2CC44449C5697B326919703BAC031CAE7F60",
        public_key: "D75A980182B10AB7D54BFED3C964073A0EE172F3DAA62325AF021A68F707511A",
        public_key_hash: "1b3517cf5af0ac86b8efe88452908c45f5c7e079",
        signature: "96B777B0D75DC03822588E1D538F982B83E56F9C432E7A164B4605E84FAD7532\
                    71D019512B61ECE691A21A518E70E4032D056C3181466390D4A87B811C537E01",
        address_prefix: &[6, 161, 159],
        public_key_prefix: &[13, 15, 37, 217],
        private_key_prefix: &[13, 15, 58, 7],
        signature_prefix: &[9, 245, 205, 134, 18],
    };

    pub static TEST_SECP256K1: TestData = TestData {
        curve: Secp256k1,
        private_key: "FF144C6039513E4FA95C4574B56EBB6F771FB0B0EA21E0EE4F6F3F934DE56B1C",
        public_key: "020E1F0D9D8A8E7428A8845771DADBD115B6A8757864C98EFE0BBCA6D33B79C682",
        public_key_hash: "4589cd40a5f06f3a7a5c1106c815a4eff1ae65f5",
        signature: "5CBB7672560C1BFB3089DED0EAEAB54D328A63FB0410D7C322F66A2763ADB4C5\
                    67B9C511DF04EED775B01BBF5650A07AEEAB8F2C123AA32C59337EC043B74911",
        address_prefix: &[6, 161, 161],
        public_key_prefix: &[3, 254, 226, 86],
        private_key_prefix: &[17, 162, 224, 201],
        signature_prefix: &[13, 115, 101, 19, 63],
    };

    pub static TEST_NIST_P256: TestData = TestData {
        curve: NistP256,
        private_key: "0F7BE7F8FB8717FF79C77FD770C6B159C1D14EA3B632E121DD13D74423635E52",
        public_key: "030BBCE70C59A4C619466756895BCCD57A152706BE66273F518CC812FF6FE37D07",
        public_key_hash: "d69776f16cb447c0b9083dad95fb340ed92a7397",
        signature: "6C2629D4CCE65A5E53F5C6ECAB53F9A0AFAB204A927EC999F2A500C315597CB9\
                    E316D884BD57013E8494914E5378823821E2F723046FEFD4AE74AE2BB0F69FB6",
        address_prefix: &[6, 161, 164],
        public_key_prefix: &[3, 178, 139, 127],
        private_key_prefix: &[16, 81, 238, 189],
        signature_prefix: &[54, 240, 44, 52],
    };

    pub static ALL: [&TestData; 3] = [&TEST_ED25519, &TEST_SECP256K1, &TEST_NIST_P256];

    pub fn key(data: &TestData) -> Key {
        Key::from_bytes(hex::decode(data.private_key).unwrap(), data.curve).unwrap()
    }
}

/// Validates key import, signing, verification and prefixes for a curve.
fn run_full_api_flow(data: &TestData) {
    let key = key(data);
    let public = key.public_key().expect("public key derivation failed");

    assert_eq!(key.curve(), data.curve);
    assert_eq!(public.to_string(), data.public_key);
    assert_eq!(hex::encode(public.hash()), data.public_key_hash);

    // Signing
    let signature = key.sign(&MESSAGE).unwrap();
    assert_eq!(signature.to_string(), data.signature);
    assert_eq!(signature.len(), data.curve.signature_size());
    assert_eq!(key.verify(&MESSAGE, &signature), Ok(true));

    // Verification through an imported public key
    let imported = PublicKey::from_slice(hex::decode(data.public_key).unwrap(), data.curve).unwrap();
    assert_eq!(&imported, public);
    assert_eq!(imported.verify(&MESSAGE, &signature), Ok(true));

    // Prefixes
    assert_eq!(data.curve.address_prefix(), data.address_prefix);
    assert_eq!(data.curve.public_key_prefix(), data.public_key_prefix);
    assert_eq!(data.curve.private_key_prefix(), data.private_key_prefix);
    assert_eq!(data.curve.signature_prefix(), data.signature_prefix);
}

#[test]
fn test_ed25519_implementation() {
    run_full_api_flow(&TEST_ED25519);
}

#[test]
fn test_secp256k1_implementation() {
    run_full_api_flow(&TEST_SECP256K1);
}

#[test]
fn test_nist_p256_implementation() {
    run_full_api_flow(&TEST_NIST_P256);
}

#[test]
fn test_empty_message() {
    let expected = [
        (&TEST_SECP256K1, "6DA364A766B7CA077657EE62B5CA0F4C0EBBB41D2602FB85F0734A1C41B2B702\
                           37DFB2B4C8C85C5403486D07DE16E388736539B842869E1C8D876A440EC5B2E9"),
        (&TEST_NIST_P256, "BA6DF7DFFD77AADD14A61D2646372EBF0F7C5EC9A678C8ADFC8DD15AB980AB01\
                           24A8819AD449F011D4DFFE9780F6DC91B254124375000F577A68E615EC8FCBC3"),
    ];

    for (data, signature) in expected {
        let key = key(data);
        let signed = key.sign(b"").unwrap();
        assert_eq!(signed.to_string(), signature);
        assert_eq!(key.verify(b"", &signed), Ok(true));
    }
}

#[test]
fn test_signing_is_deterministic() {
    for data in ALL {
        let first = key(data).sign(&MESSAGE).unwrap();
        let second = key(data).sign(&MESSAGE).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_tampered_message_and_signature() {
    for data in ALL {
        let key = key(data);
        let signature = key.sign(&MESSAGE).unwrap();

        let mut message = MESSAGE.as_bytes().to_vec();
        for bit in 0..message.len() * 8 {
            message[bit / 8] ^= 1 << (bit % 8);
            assert_eq!(key.verify(&message, &signature), Ok(false), "{} message bit {bit}", data.curve);
            message[bit / 8] ^= 1 << (bit % 8);
        }

        let mut bytes = signature.as_bytes().to_vec();
        for bit in 0..bytes.len() * 8 {
            bytes[bit / 8] ^= 1 << (bit % 8);
            assert_eq!(key.verify(&MESSAGE, &bytes), Ok(false), "{} signature bit {bit}", data.curve);
            bytes[bit / 8] ^= 1 << (bit % 8);
        }
    }
}

#[test]
fn test_curve_isolation() {
    for data in ALL {
        let signature = key(data).sign(&MESSAGE).unwrap();

        for other in ALL.iter().filter(|other| other.curve != data.curve) {
            let other_key = key(other);
            assert_ne!(other_key.public_key().unwrap(), key(data).public_key().unwrap());
            assert_ne!(other_key.sign(&MESSAGE).unwrap(), signature);

            let verified = other_key.verify(&MESSAGE, &signature);
            assert!(matches!(verified, Ok(false) | Err(Error::InvalidEncoding(_))));
        }
    }
}

#[test]
fn test_concurrent_keys_keep_their_curve() {
    let keys: Vec<Arc<Key>> = ALL.iter().map(|data| Arc::new(key(data))).collect();

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let key = Arc::clone(&keys[i % keys.len()]);
            let data = ALL[i % ALL.len()];
            thread::spawn(move || {
                assert_eq!(key.curve(), data.curve);
                assert_eq!(key.public_key().unwrap().to_string(), data.public_key);
                assert_eq!(key.sign(&MESSAGE).unwrap().to_string(), data.signature);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_mnemonic_keys() {
    let expected = [
        (Ed25519, "C5785E1865B708938AFF8161D573006496663B1AA10834E396DC566869A2C66A"),
        (Secp256k1, "029058AF2E7B6F0DC54D96925B80868515BF87F3158E95AFCE81927B3B772D5B24"),
        (NistP256, "02DCECACAE970B75187742BFA8E5201180F574F85C65AC1F70F250451AD80EF780"),
    ];

    for (curve, public_key) in expected {
        let key = Key::from_mnemonic(PHRASE, "", curve).unwrap();
        assert_eq!(key.public_key().unwrap().to_string(), public_key);
    }

    assert!(mnemonic::is_valid(PHRASE));
    assert!(matches!(
        Key::from_mnemonic("abandon about", "", Ed25519),
        Err(Error::InvalidMnemonic(_))
    ));
}

#[test]
fn test_random_keys() {
    for curve in [Ed25519, Secp256k1, NistP256] {
        let first = Key::random(curve).unwrap();
        let second = Key::random(curve).unwrap();

        assert_ne!(first.private_key(), second.private_key());
        let signature = first.sign(&MESSAGE).unwrap();
        assert_eq!(first.verify(&MESSAGE, &signature), Ok(true));
    }
}

#[test]
fn test_bls12_381_is_unsupported() {
    let unsupported = |operation| Error::UnsupportedCurveOperation {
        curve: Bls12_381,
        operation,
    };

    assert_eq!(Bls12_381.address_prefix(), &[6, 161, 166]);
    assert_eq!(Bls12_381.public_key_prefix(), &[6, 149, 135, 204]);
    assert_eq!(Bls12_381.private_key_prefix(), &[3, 150, 192, 40]);
    assert_eq!(Bls12_381.signature_prefix(), &[40, 171, 64, 207]);

    assert_eq!(PrivateKey::from_slice([1u8; 32], Bls12_381).unwrap_err(), unsupported("import private key"));
    assert_eq!(Key::from_seed([1u8; 64], Bls12_381).unwrap_err(), unsupported("derive private key"));
    assert_eq!(Key::random(Bls12_381).unwrap_err(), unsupported("derive private key"));
    assert_eq!(PublicKey::from_slice([1u8; 48], Bls12_381).unwrap_err(), unsupported("import public key"));
    assert_eq!(Bls12_381.verify(&[0; 48], b"", &[0; 96]), Err(unsupported("verify")));
}

#[test]
fn test_curve_names() {
    for curve in Curve::ALL {
        assert_eq!(Curve::from_str(&curve.to_string()), Ok(curve));
    }
    assert_eq!("p256".parse::<Curve>(), Ok(NistP256));
    assert!("ed448".parse::<Curve>().is_err());
}

#[test]
fn test_private_key_range() {
    let order_k1 = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";
    let order_p256 = "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551";

    for (curve, order) in [(Secp256k1, order_k1), (NistP256, order_p256)] {
        let order = hex::decode(order).unwrap();
        assert!(matches!(PrivateKey::from_slice(&order, curve), Err(Error::InvalidKeyMaterial(_))));
        assert!(matches!(PrivateKey::from_slice([0u8; 32], curve), Err(Error::InvalidKeyMaterial(_))));

        // A seed equal to the order reduces to zero
        assert!(matches!(Key::from_seed(&order, curve), Err(Error::InvalidKeyMaterial(_))));

        let mut below = order.clone();
        below[31] -= 1;
        assert!(PrivateKey::from_slice(&below, curve).is_ok());

        // A seed just above the order reduces to one
        let mut above = order.clone();
        above[31] += 1;
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(Key::from_seed(&above, curve).unwrap().private_key().as_bytes(), &one);
    }
}

#[test]
fn test_error_cases() {
    // Wrong lengths
    for curve in [Ed25519, Secp256k1, NistP256] {
        assert!(matches!(PrivateKey::from_slice([1u8; 31], curve), Err(Error::InvalidKeyMaterial(_))));
        assert!(matches!(Key::from_seed([1u8; 31], curve), Err(Error::InvalidKeyMaterial(_))));
        assert!(matches!(PublicKey::from_slice([2u8; 31], curve), Err(Error::InvalidEncoding(_))));
    }

    // Wrong signature length
    for data in ALL {
        let key = key(data);
        let signature = key.sign(&MESSAGE).unwrap();
        assert!(matches!(
            key.verify(&MESSAGE, &&signature.as_bytes()[..63]),
            Err(Error::InvalidEncoding(_))
        ));
    }

    // Points not on the curve: x = 0 on secp256k1, x = 1 on P-256
    for (curve, x) in [(Secp256k1, 0u8), (NistP256, 1u8)] {
        let mut off_curve = [0u8; 33];
        off_curve[0] = 0x02;
        off_curve[32] = x;

        assert!(matches!(PublicKey::from_slice(off_curve, curve), Err(Error::InvalidEncoding(_))));
        assert!(matches!(
            curve.verify(&off_curve, MESSAGE.as_bytes(), &[1; 64]),
            Err(Error::InvalidEncoding(_))
        ));
    }

    // Signature parsing
    assert!(Signature::from_str("0102").is_ok());
    assert!(Signature::from_str("010").is_err());
}

#[test]
fn test_private_key_hygiene() {
    let mut private = key(&TEST_SECP256K1).private_key().clone();

    assert!(!format!("{private:?}").contains(&TEST_SECP256K1.private_key[..8]));
    assert_eq!(&private, key(&TEST_SECP256K1).private_key());

    private.zeroize();
    assert!(private.as_bytes().iter().all(|&b| b == 0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_round_trip(
        seed in proptest::array::uniform32(any::<u8>()),
        message in proptest::collection::vec(any::<u8>(), 0..100),
    ) {
        for curve in [Ed25519, Secp256k1, NistP256] {
            let key = Key::from_seed(seed, curve).unwrap();
            let signature = key.sign(&message).unwrap();
            prop_assert_eq!(key.verify(&message, &signature), Ok(true));

            let public = PublicKey::from_slice(key.public_key().unwrap().as_bytes(), curve).unwrap();
            prop_assert_eq!(public.verify(&message, &signature), Ok(true));
        }
    }
}
