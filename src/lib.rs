// Bridge between a Limon mobile base and a Zenoh bus

pub mod base;
pub mod config;
pub mod ingress;
pub mod kinematics;
pub mod messages;
pub mod mode;
pub mod runtime;
pub mod status;
