pub mod broadcast_refresh;

pub use broadcast_refresh::BroadcastRecordRefresh;
