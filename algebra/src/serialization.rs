use crate::bls12_381::{BLSScalar, BLSG1, BLSG2};
use crate::prelude::*;

/// Canonical byte encoding used by the serde implementations of scalars and
/// group elements.
pub trait TesseraFromToBytes: Sized {
    /// Convert to bytes.
    fn tessera_to_bytes(&self) -> Vec<u8>;

    /// Reconstruct from bytes.
    fn tessera_from_bytes(bytes: &[u8]) -> core::result::Result<Self, AlgebraError>;
}

/// Visitor collecting either a byte buffer or a base64 string.
pub struct BytesVisitor;

impl<'de> serde::de::Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> ark_std::fmt::Result {
        formatter.write_str("a valid byte encoding or a base64 string")
    }

    fn visit_bytes<E>(self, v: &[u8]) -> core::result::Result<Vec<u8>, E>
    where
        E: serde::de::Error,
    {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> core::result::Result<Vec<u8>, E>
    where
        E: serde::de::Error,
    {
        Ok(v)
    }

    fn visit_str<E>(self, v: &str) -> core::result::Result<Vec<u8>, E>
    where
        E: serde::de::Error,
    {
        b64dec(v).map_err(serde::de::Error::custom)
    }

    fn visit_seq<V>(self, mut seq: V) -> core::result::Result<Vec<u8>, V::Error>
    where
        V: serde::de::SeqAccess<'de>,
    {
        let mut bytes = Vec::new();
        while let Some(b) = seq.next_element::<u8>()? {
            bytes.push(b);
        }
        Ok(bytes)
    }
}

/// Implement serde on top of [`TesseraFromToBytes`]: base64 strings for
/// human-readable formats, raw bytes otherwise.
#[macro_export]
macro_rules! serialize_deserialize {
    ($t:ident) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&$crate::utils::b64enc(
                        &$crate::serialization::TesseraFromToBytes::tessera_to_bytes(self),
                    ))
                } else {
                    serializer.serialize_bytes(
                        &$crate::serialization::TesseraFromToBytes::tessera_to_bytes(self),
                    )
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bytes = if deserializer.is_human_readable() {
                    deserializer.deserialize_str($crate::serialization::BytesVisitor)?
                } else {
                    deserializer.deserialize_bytes($crate::serialization::BytesVisitor)?
                };
                <$t as $crate::serialization::TesseraFromToBytes>::tessera_from_bytes(
                    bytes.as_slice(),
                )
                .map_err(serde::de::Error::custom)
            }
        }
    };
}

macro_rules! to_from_bytes_scalar {
    ($t:ident) => {
        impl TesseraFromToBytes for $t {
            fn tessera_to_bytes(&self) -> Vec<u8> {
                self.to_bytes()
            }
            fn tessera_from_bytes(bytes: &[u8]) -> core::result::Result<$t, AlgebraError> {
                <$t as Scalar>::from_bytes(bytes)
            }
        }
    };
}

macro_rules! to_from_bytes_group {
    ($g:ident) => {
        impl TesseraFromToBytes for $g {
            fn tessera_to_bytes(&self) -> Vec<u8> {
                self.to_compressed_bytes()
            }
            fn tessera_from_bytes(bytes: &[u8]) -> core::result::Result<$g, AlgebraError> {
                $g::from_compressed_bytes(bytes)
            }
        }
    };
}

to_from_bytes_scalar!(BLSScalar);
to_from_bytes_group!(BLSG1);
to_from_bytes_group!(BLSG2);

serialize_deserialize!(BLSScalar);
serialize_deserialize!(BLSG1);
serialize_deserialize!(BLSG2);

#[cfg(test)]
mod test {
    use crate::bls12_381::{BLSScalar, BLSG1, BLSG2};
    use crate::prelude::*;

    #[test]
    fn scalar_serde_round_trip() {
        let mut prng = test_rng();
        let s = BLSScalar::random(&mut prng);

        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<BLSScalar>(&json).unwrap(), s);

        let bin = bincode::serialize(&s).unwrap();
        assert_eq!(bincode::deserialize::<BLSScalar>(&bin).unwrap(), s);
    }

    #[test]
    fn group_serde_round_trip() {
        let mut prng = test_rng();
        let g1 = BLSG1::random(&mut prng);
        let g2 = BLSG2::random(&mut prng);

        let json = serde_json::to_string(&g1).unwrap();
        assert_eq!(serde_json::from_str::<BLSG1>(&json).unwrap(), g1);

        let bin = bincode::serialize(&g2).unwrap();
        assert_eq!(bincode::deserialize::<BLSG2>(&bin).unwrap(), g2);
    }

    #[test]
    fn truncated_encodings_are_rejected() {
        let g1 = BLSG1::get_base();
        let bytes = g1.to_compressed_bytes();
        let short = &bytes[..bytes.len() - 1];
        assert!(BLSG1::tessera_from_bytes(short).is_err());
        assert!(BLSScalar::tessera_from_bytes(&[1u8; 5]).is_err());
    }
}
