// SPDX-License-Identifier: MIT
//! Item readers sharing one source must never see each other's bytes

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::thread;

use blob_archive::{Blob, ItemLookup, Phase, StreamingBlob};

fn one_two() -> StreamingBlob<Cursor<Vec<u8>>> {
    let mut blob = Blob::new();
    blob.append("one", [1u8, 2, 3]);
    blob.append("two", [4u8, 5]);
    StreamingBlob::open(Cursor::new(blob.to_vec().unwrap())).unwrap()
}

fn read_byte<R: Read>(reader: &mut R) -> u8 {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte).unwrap();
    byte[0]
}

#[test]
fn test_seek_then_read_third_byte() {
    let streaming = one_two();

    let mut one = streaming.get_by_id("one").unwrap();
    one.seek(SeekFrom::Start(2)).unwrap();
    assert_eq!(read_byte(&mut one), 3);

    let mut two = streaming.get_by_id("two").unwrap();
    let mut data = Vec::new();
    two.read_to_end(&mut data).unwrap();
    assert_eq!(data, vec![4, 5]);
}

#[test]
fn test_seek_from_end_and_current() {
    let streaming = one_two();
    let mut one = streaming.get_by_id("one").unwrap();

    assert_eq!(one.seek(SeekFrom::End(-1)).unwrap(), 2);
    assert_eq!(one.seek(SeekFrom::Current(-1)).unwrap(), 1);
    assert_eq!(read_byte(&mut one), 2);
}

#[test]
fn test_interleaved_reads_stay_in_their_items() {
    let streaming = one_two();
    let mut one = streaming.get_by_id("one").unwrap();
    let mut two = streaming.get_by_id("two").unwrap();

    assert_eq!(read_byte(&mut one), 1);
    assert_eq!(read_byte(&mut two), 4);
    assert_eq!(read_byte(&mut one), 2);
    assert_eq!(read_byte(&mut two), 5);
    assert_eq!(read_byte(&mut one), 3);

    let mut buf = [0u8; 4];
    assert_eq!(one.read(&mut buf).unwrap(), 0);
    assert_eq!(two.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_end_of_item_does_not_leak_into_neighbour() {
    let streaming = one_two();
    let mut one = streaming.get_by_id("one").unwrap();

    // leave the shared source positioned inside "two"
    let mut two = streaming.get_by_id("two").unwrap();
    read_byte(&mut two);

    let mut buf = [0u8; 16];
    let n = one.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], &[1, 2, 3]);
    assert_eq!(one.read(&mut buf).unwrap(), 0);

    one.seek(SeekFrom::Current(100)).unwrap();
    assert_eq!(one.position(), 3);
    assert_eq!(one.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_same_item_twice_has_independent_cursors() {
    let streaming = one_two();
    let mut a = streaming.get_by_id("one").unwrap();
    let mut b = streaming.get_by_id("one").unwrap();

    a.seek(SeekFrom::Start(1)).unwrap();
    assert_eq!(read_byte(&mut b), 1);
    assert_eq!(read_byte(&mut a), 2);
    assert_eq!(read_byte(&mut b), 2);
}

#[test]
fn test_duplicate_identifier_streams_first_entry() {
    let mut blob = Blob::new();
    blob.append("dup", b"first");
    blob.append("dup", b"second");
    let streaming = StreamingBlob::open(Cursor::new(blob.to_vec().unwrap())).unwrap();

    assert_eq!(
        streaming.get_by_id("dup").unwrap().read_to_vec().unwrap(),
        b"first"
    );
    assert_eq!(
        streaming.get_by_index(1).unwrap().read_to_vec().unwrap(),
        b"second"
    );
}

#[test]
fn test_readers_across_threads() {
    let mut blob = Blob::new();
    let items: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 4096]).collect();
    for (i, data) in items.iter().enumerate() {
        blob.append(format!("item-{}", i), data);
    }
    let streaming = StreamingBlob::open(Cursor::new(blob.to_vec().unwrap())).unwrap();

    let handles: Vec<_> = (0..items.len())
        .map(|i| {
            let mut reader = streaming.get_by_index(i).unwrap();
            thread::spawn(move || {
                let mut data = Vec::new();
                let mut chunk = [0u8; 100];
                loop {
                    let n = reader.read(&mut chunk).unwrap();
                    if n == 0 {
                        break;
                    }
                    data.extend_from_slice(&chunk[..n]);
                }
                data
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), items[i]);
    }
}

#[test]
fn test_truncated_data_fails_in_both_models() {
    let mut blob = Blob::new();
    blob.append("one", [1u8, 2, 3, 4, 5, 6]);
    let mut bytes = blob.to_vec().unwrap();
    bytes.truncate(bytes.len() - 3);

    let eager = Blob::from_slice(&bytes).unwrap_err();
    assert_eq!(eager.phase(), Some(Phase::Data));

    let streaming = StreamingBlob::open(Cursor::new(bytes)).unwrap();
    let mut one = streaming.get_by_id("one").unwrap();
    assert_eq!(one.len(), 6);

    let err = one.read_to_vec().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

    let err = streaming.read_item(b"one").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

    // bytes that do exist stay readable
    let mut head = [0u8; 3];
    one.seek(SeekFrom::Start(0)).unwrap();
    one.read_exact(&mut head).unwrap();
    assert_eq!(head, [1u8, 2, 3]);
}
