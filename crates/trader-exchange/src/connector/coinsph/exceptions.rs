//! coins.ph 에러 코드 테이블.
//!
//! 참고: <https://coins-docs.github.io/errors/>

use crate::classifier::{ErrorClassifier, ErrorTable};
use crate::error::ErrorKind;

/// 응답 코드 정확 매칭.
pub const EXACT: ErrorTable = &[
    ("-1000", ErrorKind::BadRequest),
    ("-1001", ErrorKind::BadRequest),
    ("-1002", ErrorKind::Authentication),
    ("-1003", ErrorKind::RateLimitExceeded),
    ("-1004", ErrorKind::InvalidOrder),
    ("-1006", ErrorKind::BadResponse),
    ("-1007", ErrorKind::BadResponse),
    ("-1014", ErrorKind::InvalidOrder),
    ("-1015", ErrorKind::RateLimitExceeded),
    ("-1016", ErrorKind::NotSupported),
    ("-1020", ErrorKind::NotSupported),
    ("-1021", ErrorKind::BadRequest),
    ("-1022", ErrorKind::BadRequest),
    ("-1023", ErrorKind::Authentication),
    ("-1024", ErrorKind::BadRequest),
    ("-1025", ErrorKind::BadRequest),
    ("-1030", ErrorKind::Exchange),
    ("-1100", ErrorKind::BadRequest),
    ("-1101", ErrorKind::BadRequest),
    ("-1102", ErrorKind::BadRequest),
    ("-1103", ErrorKind::BadRequest),
    ("-1104", ErrorKind::BadRequest),
    ("-1105", ErrorKind::BadRequest),
    ("-1106", ErrorKind::BadRequest),
    ("-1111", ErrorKind::BadRequest),
    ("-1112", ErrorKind::BadResponse),
    ("-1114", ErrorKind::BadRequest),
    ("-1115", ErrorKind::InvalidOrder),
    ("-1116", ErrorKind::InvalidOrder),
    ("-1117", ErrorKind::InvalidOrder),
    ("-1118", ErrorKind::InvalidOrder),
    ("-1119", ErrorKind::InvalidOrder),
    ("-1120", ErrorKind::BadRequest),
    ("-1121", ErrorKind::BadSymbol),
    ("-1122", ErrorKind::InvalidOrder),
    ("-1125", ErrorKind::BadRequest),
    ("-1127", ErrorKind::BadRequest),
    ("-1128", ErrorKind::BadRequest),
    ("-1130", ErrorKind::BadRequest),
    ("-1131", ErrorKind::InsufficientFunds),
    ("-1132", ErrorKind::InvalidOrder),
    ("-1133", ErrorKind::InvalidOrder),
    ("-1134", ErrorKind::InvalidOrder),
    ("-1135", ErrorKind::InvalidOrder),
    ("-1136", ErrorKind::InvalidOrder),
    ("-1137", ErrorKind::InvalidOrder),
    ("-1138", ErrorKind::InvalidOrder),
    ("-1139", ErrorKind::InvalidOrder),
    ("-1140", ErrorKind::InvalidOrder),
    ("-1141", ErrorKind::DuplicateOrderId),
    ("-1142", ErrorKind::InvalidOrder),
    ("-1143", ErrorKind::OrderNotFound),
    ("-1144", ErrorKind::InvalidOrder),
    ("-1145", ErrorKind::InvalidOrder),
    ("-1146", ErrorKind::InvalidOrder),
    ("-1147", ErrorKind::InvalidOrder),
    ("-1148", ErrorKind::InvalidOrder),
    ("-1149", ErrorKind::InvalidOrder),
    ("-1150", ErrorKind::InvalidOrder),
    ("-1151", ErrorKind::BadSymbol),
    ("-1152", ErrorKind::NotSupported),
    ("-1153", ErrorKind::Authentication),
    ("-1154", ErrorKind::BadRequest),
    ("-1155", ErrorKind::BadRequest),
    ("-1156", ErrorKind::InvalidOrder),
    ("-1157", ErrorKind::BadSymbol),
    ("-1158", ErrorKind::InvalidOrder),
    ("-1159", ErrorKind::InvalidOrder),
    ("-1160", ErrorKind::BadRequest),
    ("-1161", ErrorKind::BadRequest),
    ("-2010", ErrorKind::InvalidOrder),
    ("-2013", ErrorKind::OrderNotFound),
    ("-2011", ErrorKind::BadRequest),
    ("-2014", ErrorKind::BadRequest),
    ("-2015", ErrorKind::Authentication),
    ("-2016", ErrorKind::BadResponse),
    ("-3126", ErrorKind::InvalidOrder),
    ("-3127", ErrorKind::InvalidOrder),
    ("-4001", ErrorKind::BadRequest),
    ("-100011", ErrorKind::BadSymbol),
    ("-100012", ErrorKind::BadSymbol),
    ("-30008", ErrorKind::InsufficientFunds),
    ("-30036", ErrorKind::InsufficientFunds),
    ("403", ErrorKind::ExchangeNotAvailable),
];

/// 응답 본문 부분 문자열 매칭. 정확 매칭보다 먼저 검사합니다.
pub const BROAD: ErrorTable = &[
    ("Unknown order sent", ErrorKind::OrderNotFound),
    ("Duplicate order sent", ErrorKind::DuplicateOrderId),
    ("Market is closed", ErrorKind::BadSymbol),
    ("Account has insufficient balance for requested action", ErrorKind::InsufficientFunds),
    ("Market orders are not supported for this symbol", ErrorKind::BadSymbol),
    ("Iceberg orders are not supported for this symbol", ErrorKind::BadSymbol),
    ("Stop loss orders are not supported for this symbol", ErrorKind::BadSymbol),
    ("Stop loss limit orders are not supported for this symbol", ErrorKind::BadSymbol),
    ("Take profit orders are not supported for this symbol", ErrorKind::BadSymbol),
    ("Take profit limit orders are not supported for this symbol", ErrorKind::BadSymbol),
    ("Price* QTY is zero or less", ErrorKind::BadRequest),
    ("IcebergQty exceeds QTY", ErrorKind::BadRequest),
    ("This action disabled is on this account", ErrorKind::PermissionDenied),
    ("Unsupported order combination", ErrorKind::InvalidOrder),
    ("Order would trigger immediately", ErrorKind::InvalidOrder),
    ("Cancel order is invalid. Check origClOrdId and orderId", ErrorKind::InvalidOrder),
    ("Order would immediately match and take", ErrorKind::OrderImmediatelyFillable),
    ("PRICE_FILTER", ErrorKind::InvalidOrder),
    ("LOT_SIZE", ErrorKind::InvalidOrder),
    ("MIN_NOTIONAL", ErrorKind::InvalidOrder),
    ("MAX_NUM_ORDERS", ErrorKind::InvalidOrder),
    ("MAX_ALGO_ORDERS", ErrorKind::InvalidOrder),
    ("BROKER_MAX_NUM_ORDERS", ErrorKind::InvalidOrder),
    ("BROKER_MAX_ALGO_ORDERS", ErrorKind::InvalidOrder),
    ("ICEBERG_PARTS", ErrorKind::BadRequest),
];

/// coins.ph 에러 분류기.
pub const CLASSIFIER: ErrorClassifier = ErrorClassifier::new("coinsph", EXACT, BROAD);
