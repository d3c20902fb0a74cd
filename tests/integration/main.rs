//! Integration tests for the tracker client
//!
//! These tests use wiremock to stand in for an osTicket installation and
//! check the login, relogin-and-retry and link insertion flows end-to-end.

mod tracker_tests;
