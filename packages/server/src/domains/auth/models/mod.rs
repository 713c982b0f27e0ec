pub mod identifier;
pub mod otp_code;

pub use identifier::{is_admin_identifier, is_test_identifier, TEST_CODE, TEST_IDENTIFIER};
pub use otp_code::{
    generate_code, hash_code, is_well_formed_code, render_otp_message, OtpCode, OtpPolicy,
};
