// Domain layer - plain data types shared by every other layer
pub mod brand;
pub mod card;
pub mod entity;
pub mod item;
pub mod shape;
