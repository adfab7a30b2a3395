pub mod roster_dto;
