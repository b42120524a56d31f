pub mod map;
pub mod places;
pub mod request;
pub mod routes;
