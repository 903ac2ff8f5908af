pub(crate) mod api_key_controller;
pub(crate) mod chat_controller;
pub(crate) mod health_check_controller;
