mod helpers;

mod claim_test;
mod password_reset_test;
