pub mod links_dto;
pub mod update_user_dto;
