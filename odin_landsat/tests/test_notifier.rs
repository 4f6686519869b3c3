/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![allow(unused)]

use std::{sync::{Arc, Mutex}, time::Duration};
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use tokio::time::sleep;
use odin_landsat::{parse_datetime, SceneRecord, errors::OdinLandsatError};
use odin_landsat::notifier::{
    immediate_message, pending_message, schedule_notification, NotificationSchedule, NotificationState, OverpassNotifier
};

type Messages = Arc<Mutex<Vec<String>>>;

fn now ()->DateTime<Utc> {
    parse_datetime( "2024-05-02T14:00:00Z").unwrap()
}

fn recording_sink ()->(Messages, impl Fn(&str) + Send + Sync + 'static) {
    let msgs: Messages = Arc::new( Mutex::new( Vec::new()));
    let sink_msgs = msgs.clone();
    (msgs, move |msg: &str| sink_msgs.lock().unwrap().push( msg.to_string()))
}

fn received (msgs: &Messages)->Vec<String> {
    msgs.lock().unwrap().clone()
}

fn scene (acquisition_start_time: &str)->SceneRecord {
    scene_at( 12, acquisition_start_time)
}

fn scene_at (wrs_path: u32, acquisition_start_time: &str)->SceneRecord {
    serde_json::from_value( json!({
        "wrsPath": wrs_path, "wrsRow": 8,
        "acquisitionStartTime": acquisition_start_time,
        "acquisitionDay": "2024-05-02",
        "landCloudCover": "3.2"
    })).unwrap()
}

fn minutes (n: u64)->Duration { Duration::from_secs( n * 60) }

#[test]
fn test_schedule_fields () {
    let acq = now() + TimeDelta::minutes(30);
    let sched = NotificationSchedule::new( acq, 10, "soon");

    assert_eq!( sched.fire_at_epoch_millis, acq.timestamp_millis() - 600_000);
    assert_eq!( sched.fire_at(), Some( now() + TimeDelta::minutes(20)));
    assert_eq!( sched.delay_from( now()), Some( minutes(20)));
    assert_eq!( sched.delay_from( now() + TimeDelta::minutes(20)), None);
    assert_eq!( sched.delay_from( now() + TimeDelta::minutes(25)), None);
}

#[tokio::test(start_paused = true)]
async fn test_fires_at_lead_time () {
    let (msgs, sink) = recording_sink();
    let mut notifier = OverpassNotifier::new( sink);

    let state = notifier.update( now() + TimeDelta::minutes(30), 10, now(), "overpass");
    assert_eq!( state, NotificationState::Pending);

    sleep( minutes(20) - Duration::from_secs(1)).await;
    assert!( received( &msgs).is_empty());
    assert_eq!( notifier.state(), Some( NotificationState::Pending));

    sleep( Duration::from_secs(2)).await;
    assert_eq!( received( &msgs), vec!["overpass".to_string()]);
    assert_eq!( notifier.state(), Some( NotificationState::Fired));
    assert!( !notifier.cancel()); // already fired
}

#[tokio::test(start_paused = true)]
async fn test_fires_immediately_within_lead_time () {
    let (msgs, sink) = recording_sink();
    let mut notifier = OverpassNotifier::new( sink);

    let state = notifier.update_for_scene( &scene( "2024-05-02T14:05:00Z"), 10, now()).unwrap();
    assert_eq!( state, NotificationState::Fired);
    assert_eq!( received( &msgs), vec![immediate_message()]);
    assert_eq!( received( &msgs)[0], "Landsat is passing over right now!");

    // already happened
    let state = notifier.update_for_scene( &scene( "2024-05-02T13:00:00Z"), 10, now()).unwrap();
    assert_eq!( state, NotificationState::Fired);
    assert_eq!( received( &msgs).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_pending_scene_message () {
    let (msgs, sink) = recording_sink();
    let mut notifier = OverpassNotifier::new( sink);
    let scene = scene( "2024-05-02T14:30:00.000Z");

    let state = notifier.update_for_scene( &scene, 10, now()).unwrap();
    assert_eq!( state, NotificationState::Pending);

    sleep( minutes(21)).await;
    assert_eq!( received( &msgs), vec!["Landsat will pass over in 10 minutes! (Path: 12, Row: 8)".to_string()]);
    assert_eq!( received( &msgs)[0], pending_message( &scene, 10));
}

#[tokio::test(start_paused = true)]
async fn test_reschedule_cancels_previous () {
    let (msgs, sink) = recording_sink();
    let mut notifier = OverpassNotifier::new( sink);

    notifier.update( now() + TimeDelta::minutes(30), 10, now(), "first");
    sleep( minutes(5)).await;
    notifier.update( now() + TimeDelta::minutes(50), 10, now(), "second");

    sleep( minutes(60)).await;
    assert_eq!( received( &msgs), vec!["second".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel () {
    let (msgs, sink) = recording_sink();
    let handle = schedule_notification( now() + TimeDelta::minutes(30), 10, now(), "cancelled", sink);
    assert!( handle.is_pending());

    assert!( handle.cancel());
    assert_eq!( handle.state(), NotificationState::Cancelled);
    assert!( !handle.cancel());

    sleep( minutes(30)).await;
    assert!( received( &msgs).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_notifier_cancels () {
    let (msgs, sink) = recording_sink();
    {
        let mut notifier = OverpassNotifier::new( sink);
        notifier.update( now() + TimeDelta::minutes(15), 10, now(), "dropped");
    }
    sleep( minutes(10)).await;
    assert!( received( &msgs).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_acquisition_time_cancels_previous () {
    let (msgs, sink) = recording_sink();
    let mut notifier = OverpassNotifier::new( sink);

    let state = notifier.update_for_scene( &scene_at( 11, "2024-05-02T14:30:00Z"), 10, now()).unwrap();
    assert_eq!( state, NotificationState::Pending);

    match notifier.update_for_scene( &scene_at( 99, "not a time"), 10, now()) {
        Err(OdinLandsatError::ParseError(msg)) => assert!( msg.contains("not a time")),
        other => panic!("unexpected result {other:?}")
    }
    assert_eq!( notifier.state(), None); // nothing scheduled for the new scene

    sleep( minutes(25)).await;
    assert!( received( &msgs).is_empty());
    assert!( !notifier.cancel());
}
