use uuid::Uuid;

use crate::models::{MovieInsert, RoomMovie};

/// Places a fetched pool into a room, numbering movies from 0 in fetch order.
pub fn assign_to_room(room_id: Uuid, inserts: Vec<MovieInsert>) -> Vec<RoomMovie> {
    inserts
        .into_iter()
        .zip(0u32..)
        .map(|(insert, display_order)| insert.into_room_movie(room_id, display_order))
        .collect()
}
