//! Unified error codes for the Conch storefront
//!
//! This module defines all error codes used across the store server and its
//! clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Cart errors
//! - 4xxx: Order errors
//! - 5xxx: Payment / wallet errors
//! - 6xxx: Product / catalog errors
//! - 7xxx: Offer / coupon errors
//! - 8xxx: User / address errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account has been blocked by an administrator
    AccountDisabled = 1005,
    /// Password too short
    PasswordTooShort = 1006,
    /// OAuth token verification failed
    OAuthVerificationFailed = 1007,
    /// Account was created via OAuth and has no local password
    OAuthAccountNoPassword = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Cannot modify admin user
    CannotModifyAdmin = 2003,

    // ==================== 3xxx: Cart ====================
    /// Cart is empty
    CartEmpty = 3001,
    /// Cart line not found
    CartItemNotFound = 3002,
    /// Cart quantity invalid
    CartQuantityInvalid = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order item not found
    OrderItemNotFound = 4003,
    /// Order cannot be cancelled in its current status
    OrderNotCancellable = 4004,
    /// Order item cannot be cancelled in its current status
    OrderItemNotCancellable = 4005,
    /// Order item cannot be returned in its current status
    OrderItemNotReturnable = 4006,
    /// No return has been requested for this item
    ReturnNotRequested = 4007,
    /// Invalid order status transition
    InvalidStatusTransition = 4008,

    // ==================== 5xxx: Payment / Wallet ====================
    /// Invalid payment method
    PaymentInvalidMethod = 5001,
    /// Wallet not found
    WalletNotFound = 5002,
    /// Insufficient wallet balance
    WalletInsufficientBalance = 5003,
    /// Refund has already been issued for this item
    RefundAlreadyIssued = 5004,

    // ==================== 6xxx: Product / Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is not active
    ProductInactive = 6002,
    /// Product has invalid price
    ProductInvalidPrice = 6003,
    /// Requested quantity exceeds stock
    ProductOutOfStock = 6004,
    /// Product is not stocked in the requested size
    SizeNotStocked = 6005,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has associated products
    CategoryHasProducts = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,

    // ==================== 7xxx: Offer / Coupon ====================
    /// Offer not found
    OfferNotFound = 7001,
    /// Offer discount percent out of range
    OfferInvalidPercent = 7002,
    /// Offer validity window is invalid
    OfferInvalidWindow = 7003,
    /// Coupon not found
    CouponNotFound = 7101,
    /// Coupon is not active
    CouponInactive = 7102,
    /// Coupon has expired or is not yet valid
    CouponExpired = 7103,
    /// Order amount below the coupon minimum
    CouponMinAmountNotMet = 7104,
    /// Coupon usage limit reached
    CouponUsageLimitReached = 7105,
    /// Coupon already used by this user
    CouponAlreadyUsed = 7106,
    /// Coupon code already exists
    CouponCodeExists = 7107,

    // ==================== 8xxx: User / Address ====================
    /// User not found
    UserNotFound = 8001,
    /// Email already registered
    EmailExists = 8002,
    /// User is blocked
    UserBlocked = 8003,
    /// Administrators cannot block their own account
    CannotBlockSelf = 8004,
    /// Address not found
    AddressNotFound = 8101,
    /// Address belongs to another user
    AddressNotOwned = 8102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::OAuthVerificationFailed => "OAuth token verification failed",
            ErrorCode::OAuthAccountNoPassword => "Account uses OAuth sign-in",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotModifyAdmin => "Cannot modify administrator user",

            // Cart
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartItemNotFound => "Cart line not found",
            ErrorCode::CartQuantityInvalid => "Cart quantity is invalid",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderNotCancellable => "Order cannot be cancelled in its current status",
            ErrorCode::OrderItemNotCancellable => {
                "Order item cannot be cancelled in its current status"
            }
            ErrorCode::OrderItemNotReturnable => {
                "Order item cannot be returned in its current status"
            }
            ErrorCode::ReturnNotRequested => "No return has been requested for this item",
            ErrorCode::InvalidStatusTransition => "Invalid order status transition",

            // Payment / Wallet
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::WalletNotFound => "Wallet not found",
            ErrorCode::WalletInsufficientBalance => "Insufficient wallet balance",
            ErrorCode::RefundAlreadyIssued => "Refund has already been issued",

            // Product / Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInactive => "Product is not active",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Requested quantity exceeds available stock",
            ErrorCode::SizeNotStocked => "Product is not stocked in the requested size",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasProducts => "Category has associated products",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // Offer / Coupon
            ErrorCode::OfferNotFound => "Offer not found",
            ErrorCode::OfferInvalidPercent => "Offer discount percent must be between 1 and 90",
            ErrorCode::OfferInvalidWindow => "Offer end time must be after its start time",
            ErrorCode::CouponNotFound => "Coupon not found",
            ErrorCode::CouponInactive => "Coupon is not active",
            ErrorCode::CouponExpired => "Coupon is outside its validity window",
            ErrorCode::CouponMinAmountNotMet => "Order amount is below the coupon minimum",
            ErrorCode::CouponUsageLimitReached => "Coupon usage limit reached",
            ErrorCode::CouponAlreadyUsed => "Coupon has already been used by this account",
            ErrorCode::CouponCodeExists => "Coupon code already exists",

            // User / Address
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::UserBlocked => "Account has been blocked",
            ErrorCode::CannotBlockSelf => "Cannot block own account",
            ErrorCode::AddressNotFound => "Address not found",
            ErrorCode::AddressNotOwned => "Address belongs to another user",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),
            1006 => Ok(ErrorCode::PasswordTooShort),
            1007 => Ok(ErrorCode::OAuthVerificationFailed),
            1008 => Ok(ErrorCode::OAuthAccountNoPassword),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::CannotModifyAdmin),

            // Cart
            3001 => Ok(ErrorCode::CartEmpty),
            3002 => Ok(ErrorCode::CartItemNotFound),
            3003 => Ok(ErrorCode::CartQuantityInvalid),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderItemNotFound),
            4004 => Ok(ErrorCode::OrderNotCancellable),
            4005 => Ok(ErrorCode::OrderItemNotCancellable),
            4006 => Ok(ErrorCode::OrderItemNotReturnable),
            4007 => Ok(ErrorCode::ReturnNotRequested),
            4008 => Ok(ErrorCode::InvalidStatusTransition),

            // Payment / Wallet
            5001 => Ok(ErrorCode::PaymentInvalidMethod),
            5002 => Ok(ErrorCode::WalletNotFound),
            5003 => Ok(ErrorCode::WalletInsufficientBalance),
            5004 => Ok(ErrorCode::RefundAlreadyIssued),

            // Product / Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInactive),
            6003 => Ok(ErrorCode::ProductInvalidPrice),
            6004 => Ok(ErrorCode::ProductOutOfStock),
            6005 => Ok(ErrorCode::SizeNotStocked),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasProducts),
            6103 => Ok(ErrorCode::CategoryNameExists),

            // Offer / Coupon
            7001 => Ok(ErrorCode::OfferNotFound),
            7002 => Ok(ErrorCode::OfferInvalidPercent),
            7003 => Ok(ErrorCode::OfferInvalidWindow),
            7101 => Ok(ErrorCode::CouponNotFound),
            7102 => Ok(ErrorCode::CouponInactive),
            7103 => Ok(ErrorCode::CouponExpired),
            7104 => Ok(ErrorCode::CouponMinAmountNotMet),
            7105 => Ok(ErrorCode::CouponUsageLimitReached),
            7106 => Ok(ErrorCode::CouponAlreadyUsed),
            7107 => Ok(ErrorCode::CouponCodeExists),

            // User / Address
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::EmailExists),
            8003 => Ok(ErrorCode::UserBlocked),
            8004 => Ok(ErrorCode::CannotBlockSelf),
            8101 => Ok(ErrorCode::AddressNotFound),
            8102 => Ok(ErrorCode::AddressNotOwned),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::AccountDisabled.code(), 1005);
        assert_eq!(ErrorCode::OAuthVerificationFailed.code(), 1007);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);

        // Cart
        assert_eq!(ErrorCode::CartEmpty.code(), 3001);

        // Order
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderNotCancellable.code(), 4004);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4008);

        // Payment / Wallet
        assert_eq!(ErrorCode::WalletInsufficientBalance.code(), 5003);
        assert_eq!(ErrorCode::RefundAlreadyIssued.code(), 5004);

        // Product
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::ProductOutOfStock.code(), 6004);
        assert_eq!(ErrorCode::CategoryNotFound.code(), 6101);

        // Offer / Coupon
        assert_eq!(ErrorCode::OfferNotFound.code(), 7001);
        assert_eq!(ErrorCode::CouponAlreadyUsed.code(), 7106);

        // User
        assert_eq!(ErrorCode::UserNotFound.code(), 8001);
        assert_eq!(ErrorCode::AddressNotFound.code(), 8101);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::OrderNotFound));
        assert_eq!(ErrorCode::try_from(6004), Ok(ErrorCode::ProductOutOfStock));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);

        let code: ErrorCode = serde_json::from_str("0").unwrap();
        assert_eq!(code, ErrorCode::Success);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::CartEmpty,
            ErrorCode::OrderNotFound,
            ErrorCode::WalletInsufficientBalance,
            ErrorCode::ProductOutOfStock,
            ErrorCode::CouponExpired,
            ErrorCode::UserBlocked,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(
            ErrorCode::ProductOutOfStock.message(),
            "Requested quantity exceeds available stock"
        );
    }
}
