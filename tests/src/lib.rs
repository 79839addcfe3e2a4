//! End-to-end scenarios and cross-engine properties. The interesting
//! contract is that both evaluators agree, so everything here runs against
//! the tree and automaton engines alike.

#[cfg(test)]
mod scenarios;
