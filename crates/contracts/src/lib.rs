pub mod dashboards;
pub mod shared;
