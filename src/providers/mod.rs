pub mod bcb_provider;
