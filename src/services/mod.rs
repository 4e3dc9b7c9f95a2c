// Tabspace services
// Services provide the building blocks the managers compose: storage, codec, crypto, badges, import, sync.

pub mod badge;
pub mod codec;
pub mod crypto_service;
pub mod import_service;
pub mod kv_store;
pub mod retry;
pub mod storage;
pub mod sync_scheduler;
pub mod workspace_model;
