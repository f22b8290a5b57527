//! Hypothesis test service
//!
//! Client side of the causal estimation server: builds estimation requests
//! from an explicitly passed [`CausalContext`], posts them, and reports
//! failures through a [`Notifier`].

mod client;
mod config;
pub mod notify;
pub mod types;

pub use client::HypothesisTestClient;
pub use config::CausalServerConfig;
pub use notify::{CollectingNotifier, Notice, NoticeKind, Notifier, TracingNotifier};
pub use types::{
    CausalContext, CausalGraph, EstimateInput, Filter, FunctionalDep, FunctionalDepParam,
    HypothesisTestRequest, HypothesisTestResult, PagLink, PagMark, ParamForm,
};
