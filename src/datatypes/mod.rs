mod callback_num;
mod command_id;
mod command_status;
mod data_coding;
mod datetime;
mod esm_class;
mod interface_version;
mod numeric_plan_indicator;
mod priority_flag;
mod registered_delivery;
mod subaddress;
mod tlv;
mod type_of_number;

pub use callback_num::CallbackNum;
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_coding::{DataCoding, DefaultScheme, GsmMessageClass};
pub use datetime::{DateTimeError, SmppTime};
pub use esm_class::{EsmClass, GsmFeatures, MessageType, MessagingMode};
pub use interface_version::InterfaceVersion;
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use priority_flag::PriorityFlag;
pub use registered_delivery::{RegisteredDelivery, SmeAcknowledgements, SmscDeliveryReceipt};
pub use subaddress::{Subaddress, SubaddressType};
pub use tlv::{dispatch as dispatch_tlv, encode as encode_tlv, tag_name, tags, OptionValue, Tlv};
pub use type_of_number::TypeOfNumber;
