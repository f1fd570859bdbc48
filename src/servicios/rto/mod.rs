pub mod tipo_servicio_rto;
