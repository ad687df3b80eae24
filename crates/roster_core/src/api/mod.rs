pub mod roster_json;

pub use roster_json::{
    add_player_json, create_team_json, get_roster_json, move_player_json, remove_player_json, ApiError,
    ApiResponse, CreateTeamRequest, GetRosterRequest, RemovePlayerRequest, SlotPlayerRequest, API_VERSION,
};
