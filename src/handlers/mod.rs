// handlers/mod.rs - Route handlers grouped by access tier
//
// public:    no authentication (service info, health, fallbacks)
// protected: bearer token plus a per-route permission

pub mod protected;
pub mod public;
