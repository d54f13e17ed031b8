//! Rule library
//!
//! Leaf predicates consumed through the [`Rule`](crate::foundation::Rule)
//! contract. Each rule is a small value type with a factory function of the
//! same name in snake case.

pub mod content;
pub mod custom;
pub mod datetime;
pub mod length;
pub mod network;
pub mod numeric;
pub mod presence;
pub mod sets;

pub use content::{Alpha, CharClass, Chars, Email, Matches, Text, Url, alpha, chars, email, matches, text, url};
pub use custom::{Callback, callback};
pub use datetime::{ConvertDate, DateFormat, DateTime, convert_date, datetime, parse_timezone};
pub use length::{MaxSize, MinSize, max_size, min_size};
pub use network::{Ip, IpVersion, ip};
pub use numeric::{
    Boolean, Float, Integer, MaxValue, MinValue, Number, boolean, float, integer, max_value,
    min_value, number,
};
pub use presence::{Required, required};
pub use sets::{Equal, IsIn, OneOf, Operand, equal, is_in, one_of};
