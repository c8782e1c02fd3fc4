//! Fee amounts of unbounded width.
//!
//! A base fee grows multiplicatively block after block, so it is kept in an arbitrary precision
//! integer and never narrowed on the way through the fee formula.

use {
    num::{BigUint, ToPrimitive, Zero},
    serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{Error, Unexpected, Visitor},
    },
    std::{fmt, str::FromStr},
};

/// Fee per unit of gas, in the smallest denomination of the native token.
///
/// Serialized as a decimal string. Deserialization accepts a decimal string, and a plain integer
/// where the format passes one through.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseFee(BigUint);

impl BaseFee {
    pub const fn new(value: BigUint) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    /// Narrows the fee for consumers with a 64-bit field, such as the Ethereum header encoding.
    ///
    /// Values that do not fit become [`u64::MAX`].
    pub fn saturating_to_u64(&self) -> u64 {
        self.0.to_u64().unwrap_or(u64::MAX)
    }

    /// Distance between two fees regardless of their order.
    pub fn abs_diff(&self, other: &Self) -> BigUint {
        if self.0 >= other.0 {
            &self.0 - &other.0
        } else {
            &other.0 - &self.0
        }
    }
}

impl From<u64> for BaseFee {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for BaseFee {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for BaseFee {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<BaseFee> for BigUint {
    fn from(value: BaseFee) -> Self {
        value.0
    }
}

impl FromStr for BaseFee {
    type Err = num::bigint::ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigUint::from_str(s).map(Self)
    }
}

impl fmt::Display for BaseFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for BaseFee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct BaseFeeVisitor;

impl Visitor<'_> for BaseFeeVisitor {
    type Value = BaseFee;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative decimal integer or a string holding one")
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(BaseFee::from(v))
    }

    fn visit_u128<E: Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(BaseFee::from(v))
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(BaseFee::from)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }
}

/// Asks for a string, which every configuration source can provide. Self-describing formats such
/// as TOML hand integers to the visitor anyway, JSON requires the string form.
impl<'de> Deserialize<'de> for BaseFee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(BaseFeeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case("0", 0; "zero")]
    #[test_case("25000000000", 25_000_000_000; "lower bound")]
    #[test_case("18446744073709551615", u64::MAX; "u64 max")]
    fn test_fee_parses_from_decimal_string(input: &str, expected: u64) {
        let actual_fee: BaseFee = input.parse().unwrap();

        assert_eq!(actual_fee, BaseFee::from(expected));
    }

    #[test_case(""; "empty")]
    #[test_case("-1"; "negative")]
    #[test_case("1.5"; "fraction")]
    #[test_case("0x10"; "hex prefix")]
    fn test_fee_rejects_non_decimal_input(input: &str) {
        assert!(input.parse::<BaseFee>().is_err(), "{input:?} should not parse");
    }

    #[test]
    fn test_fee_wider_than_u128_survives_display_round_trip() {
        let wide = BigUint::from(u128::MAX) * BigUint::from(1_000_000u32);
        let fee = BaseFee::new(wide.clone());

        let actual_fee: BaseFee = fee.to_string().parse().unwrap();

        assert_eq!(actual_fee.into_biguint(), wide);
    }

    #[test]
    fn test_fee_serializes_as_decimal_string() {
        let fee = BaseFee::from(750_000_000_000u64);

        let actual_json = serde_json::to_string(&fee).unwrap();

        assert_eq!(actual_json, r#""750000000000""#);
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        fee: BaseFee,
    }

    const WIDE: &str = "340282366920938463463374607431768211456";

    fn wide() -> BaseFee {
        BaseFee::new(BigUint::from(u128::MAX) + BigUint::from(1u8))
    }

    #[test]
    fn test_fee_deserializes_from_toml_integer() {
        let holder: Holder = toml::from_str("fee = 25000000000").unwrap();

        assert_eq!(holder.fee, BaseFee::from(25_000_000_000u64));
    }

    #[test]
    fn test_fee_deserializes_from_toml_string() {
        let holder: Holder = toml::from_str(&format!("fee = \"{WIDE}\"")).unwrap();

        assert_eq!(holder.fee, wide());
    }

    #[test]
    fn test_fee_deserializes_from_json_string() {
        let holder: Holder = serde_json::from_str(&format!(r#"{{"fee": "{WIDE}"}}"#)).unwrap();

        assert_eq!(holder.fee, wide());
    }

    #[test]
    fn test_fee_deserializes_from_environment_variable() {
        let holder: Holder =
            serde_env::from_iter_with_prefix(vec![("TEST_FEE", WIDE)], "TEST").unwrap();

        assert_eq!(holder.fee, wide());
    }

    #[test_case("fee = -1"; "negative integer")]
    #[test_case("fee = \"0x10\""; "hex string")]
    #[test_case("fee = 1.5"; "float")]
    fn test_fee_rejects_invalid_toml_values(input: &str) {
        assert!(toml::from_str::<Holder>(input).is_err(), "{input:?} should not parse");
    }

    #[test]
    fn test_saturating_to_u64_clamps_wide_values() {
        let wide = BaseFee::new(BigUint::from(u64::MAX) + BigUint::from(1u8));

        assert_eq!(wide.saturating_to_u64(), u64::MAX);
        assert_eq!(BaseFee::from(7u64).saturating_to_u64(), 7);
    }

    #[test]
    fn test_abs_diff_is_symmetric() {
        let a = BaseFee::from(100u64);
        let b = BaseFee::from(58u64);

        assert_eq!(a.abs_diff(&b), BigUint::from(42u8));
        assert_eq!(b.abs_diff(&a), BigUint::from(42u8));
    }
}
