//! UseCase layer.
//!
//! One struct per relay operation, called by the UI layer and operating
//! on the domain through the registry trait.

pub mod disconnect;
pub mod error;
pub mod join_house;
pub mod join_private;
pub mod leave_house;
pub mod send_message;

pub use disconnect::DisconnectUseCase;
pub use error::ActionError;
pub use join_house::JoinHouseUseCase;
pub use join_private::JoinPrivateHouseUseCase;
pub use leave_house::LeaveHouseUseCase;
pub use send_message::SendMessageUseCase;
