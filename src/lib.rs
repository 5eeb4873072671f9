//! Football Stats API Library
//!
//! This library provides the core functionality for the Football Stats API,
//! a league-standings service over one table of team-season records,
//! including domain logic, repositories, and infrastructure components.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
