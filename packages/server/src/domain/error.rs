//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Object validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// HouseName validation error
    #[error("HouseName cannot be empty")]
    HouseNameEmpty,

    /// HouseName too long error
    #[error("HouseName cannot exceed {max} characters (got {actual})")]
    HouseNameTooLong { max: usize, actual: usize },

    /// HouseId invalid format error (not a valid UUID)
    #[error("HouseId must be a valid UUID (got: {0})")]
    HouseIdInvalidFormat(String),

    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors raised by relay operations on the house registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// No house with the given id exists in the registry
    #[error("house not found: {0}")]
    HouseNotFound(String),

    /// The connection is not a member of the addressed house
    #[error("not a member of house {0}")]
    NotAMember(String),

    /// The connection is not registered (already closed or never opened)
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),
}
