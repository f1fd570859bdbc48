pub mod tipo_servicio_repository;
