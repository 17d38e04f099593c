diesel::table! {
    conditions (id) {
        id -> Integer,
        current_threshold -> Double,
        temperature_threshold -> Double,
        vibration_threshold -> Double,
    }
}

diesel::table! {
    motors (id) {
        id -> Integer,
        name -> Text,
        current -> Double,
        temperature -> Double,
        vibration -> Double,
        current_status -> Text,
        temperature_status -> Text,
        vibration_status -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(conditions, motors,);
