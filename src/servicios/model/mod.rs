pub mod tipo_servicio;
