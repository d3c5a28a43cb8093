//! `forge version` — client version only; the daemon is a separate
//! process and exposes no version RPC (§6).

pub fn run() {
    println!("forge {}", env!("CARGO_PKG_VERSION"));
}
