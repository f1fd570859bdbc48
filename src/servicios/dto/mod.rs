pub mod create_servicio_dto;
pub mod create_tipo_servicio_dto;
