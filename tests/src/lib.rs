//! End-to-end scenarios running the scan coordinator over in-memory capture sessions.

#[cfg(test)]
mod scan;
#[cfg(test)]
mod support;
