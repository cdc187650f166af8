// Tabstash state managers
// Managers own mutable in-memory state; here, the library of saved snapshots.

pub mod session_library;
