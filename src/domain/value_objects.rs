use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 書籍ID - カタログ管理の集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出ID - 貸出記録の集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BorrowingId(Uuid);

impl BorrowingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BorrowingId {
    fn default() -> Self {
        Self::new()
    }
}

/// 支払いID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaymentId(Uuid);

impl PaymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

/// 利用者ID - 認証コンテキストへの参照
///
/// 貸出コンテキストはIDのみを知り、利用者の詳細は知らない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// 装丁
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cover {
    #[default]
    Hard,
    Soft,
}

impl Cover {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cover::Hard => "HARD",
            Cover::Soft => "SOFT",
        }
    }
}

impl std::str::FromStr for Cover {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HARD" => Ok(Cover::Hard),
            "SOFT" => Ok(Cover::Soft),
            _ => Err(format!("Invalid cover: {}", s)),
        }
    }
}

/// 日額料金エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyFeeError {
    /// 最低料金（0.01）未満
    BelowMinimum,
    /// 小数点以下が2桁を超える
    TooManyDecimalPlaces,
    /// 全体で10桁を超える
    TooManyDigits,
}

impl std::fmt::Display for DailyFeeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DailyFeeError::BelowMinimum => write!(f, "daily_fee must be at least 0.01"),
            DailyFeeError::TooManyDecimalPlaces => {
                write!(f, "daily_fee must have at most 2 decimal places")
            }
            DailyFeeError::TooManyDigits => write!(f, "daily_fee must have at most 10 digits"),
        }
    }
}

impl std::error::Error for DailyFeeError {}

/// 日額料金
///
/// 不変条件：0.01以上、小数点以下2桁まで、全体で10桁まで。
/// 型システムでこの制約を強制し、不正な料金を作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DailyFee(Decimal);

impl DailyFee {
    /// 最低料金
    pub const MINIMUM: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

    /// 現在の料金
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for DailyFee {
    /// 1.00
    fn default() -> Self {
        Self(Decimal::new(100, 2))
    }
}

impl TryFrom<Decimal> for DailyFee {
    type Error = DailyFeeError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value < Self::MINIMUM {
            return Err(DailyFeeError::BelowMinimum);
        }
        let normalized = value.normalize();
        if normalized.scale() > 2 {
            return Err(DailyFeeError::TooManyDecimalPlaces);
        }
        // numeric(10, 2): 整数部は8桁まで
        if value.trunc() >= Decimal::new(100_000_000, 0) {
            return Err(DailyFeeError::TooManyDigits);
        }
        let mut fee = value;
        fee.rescale(2);
        Ok(Self(fee))
    }
}

impl From<DailyFee> for Decimal {
    fn from(fee: DailyFee) -> Self {
        fee.0
    }
}

impl std::fmt::Display for DailyFee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_fee_default_is_one() {
        assert_eq!(DailyFee::default().value(), Decimal::new(100, 2));
    }

    #[test]
    fn test_daily_fee_accepts_minimum() {
        let fee = DailyFee::try_from(Decimal::new(1, 2));
        assert!(fee.is_ok());
        assert_eq!(fee.unwrap().value(), Decimal::new(1, 2));
    }

    #[test]
    fn test_daily_fee_rejects_below_minimum() {
        assert_eq!(
            DailyFee::try_from(Decimal::ZERO).unwrap_err(),
            DailyFeeError::BelowMinimum
        );
        assert_eq!(
            DailyFee::try_from(Decimal::new(-150, 2)).unwrap_err(),
            DailyFeeError::BelowMinimum
        );
    }

    #[test]
    fn test_daily_fee_rejects_three_decimal_places() {
        let result = DailyFee::try_from(Decimal::new(1505, 3));
        assert_eq!(result.unwrap_err(), DailyFeeError::TooManyDecimalPlaces);
    }

    #[test]
    fn test_daily_fee_accepts_trailing_zeros() {
        // 1.500 は 1.50 と同値
        let fee = DailyFee::try_from(Decimal::new(1500, 3)).unwrap();
        assert_eq!(fee.value(), Decimal::new(150, 2));
    }

    #[test]
    fn test_daily_fee_rejects_too_many_digits() {
        let result = DailyFee::try_from(Decimal::new(100_000_000, 0));
        assert_eq!(result.unwrap_err(), DailyFeeError::TooManyDigits);
        assert!(DailyFee::try_from(Decimal::new(9_999_999_999, 2)).is_ok());
    }

    #[test]
    fn test_daily_fee_deserializes_with_validation() {
        let fee: DailyFee = serde_json::from_str("\"1.50\"").unwrap();
        assert_eq!(fee.value(), Decimal::new(150, 2));

        let err = serde_json::from_str::<DailyFee>("\"0.001\"").unwrap_err();
        assert!(err.to_string().contains("daily_fee must be at least 0.01"));

        let err = serde_json::from_str::<DailyFee>("\"1.505\"").unwrap_err();
        assert!(err.to_string().contains("at most 2 decimal places"));
    }

    #[test]
    fn test_daily_fee_serializes_as_string() {
        let fee = DailyFee::try_from(Decimal::new(150, 2)).unwrap();
        assert_eq!(serde_json::to_value(fee).unwrap(), serde_json::json!("1.50"));
    }

    #[test]
    fn test_cover_round_trips_through_str() {
        assert_eq!("HARD".parse::<Cover>().unwrap(), Cover::Hard);
        assert_eq!("SOFT".parse::<Cover>().unwrap(), Cover::Soft);
        assert!("PAPER".parse::<Cover>().is_err());
        assert_eq!(Cover::Soft.as_str(), "SOFT");
    }

    #[test]
    fn test_cover_default_is_hard() {
        assert_eq!(Cover::default(), Cover::Hard);
    }

    #[test]
    fn test_book_id_creation() {
        let id1 = BookId::new();
        let id2 = BookId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_borrowing_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = BorrowingId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }
}
