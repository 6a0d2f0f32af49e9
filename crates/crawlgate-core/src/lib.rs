pub mod agent;
pub mod directives;
pub mod policy;
pub mod provenance;
pub mod resolve;

pub use agent::{AgentIdentity, DEFAULT_AGENT, IdentityError};
pub use directives::{Directive, DirectiveTable, parse_directives};
pub use policy::{FetchStatus, PolicyDocument};
pub use provenance::ProvenanceRecord;
pub use resolve::{AccessDecision, Reason, Resolver, resolve};
