//! Screen components. The dashboard is the only screen in this app.

pub mod dashboard;
