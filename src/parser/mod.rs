pub mod record;
pub mod translator;
