pub mod session_rto;
