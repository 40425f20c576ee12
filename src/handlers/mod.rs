// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (active user) → Elevated (active admin)
//
// Tier checks live in middleware (see router.rs); handlers in protected and
// elevated receive the caller as `Extension<AuthenticatedUser>`.
pub mod public;    // Tier 1: token, health, product reads, sales reports
pub mod protected; // Tier 2: bearer token of an enabled user
pub mod elevated;  // Tier 3: bearer token of an enabled admin
