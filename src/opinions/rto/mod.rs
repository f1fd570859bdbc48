pub mod opinion_rto;
