pub mod technology_rto;
