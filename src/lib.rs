//! annosyn: gene-model annotation index and synonymous-site calculator.

pub mod error;

pub mod cli;
pub mod codon;
pub mod config;
pub mod consequence;
pub mod fasta;
pub mod feature;
pub mod gtf;
pub mod index;
pub mod reader;
pub mod reference;
pub mod region;
pub mod sequence;
pub mod store;
pub mod strand;
pub mod synonymous;
pub mod transcript;
