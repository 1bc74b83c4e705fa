pub mod cipher;
pub mod color;
pub mod date;
pub mod digest;
pub mod password;
pub mod port_range;
pub mod url;

pub use cipher::{CipherMode, reverse_alphabet};
pub use color::Rgb;
pub use date::{DEFAULT_DATE_FORMAT, DateSpan, parse_date_time};
pub use digest::{HashAlgorithm, Hasher};
pub use password::{PasswordPolicy, PasswordRequest};
pub use port_range::PortRange;
pub use url::{Charset, form_decode, form_encode};
