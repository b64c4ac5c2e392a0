// Entity simulation
pub mod world;

// Tick events
pub mod event;

// Fan-out broker and subscriber registry
pub mod broker;

// Subscriber queues and outbound protocol
pub mod subscription;

// HTTP transport adapters (SSE, WebSocket)
pub mod api;

// Configuration
pub mod config;

// Error types
pub mod error;

// Periodic tick source
pub mod ticker;
