pub mod create_technology_dto;
