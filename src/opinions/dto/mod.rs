pub mod create_opinion_dto;
